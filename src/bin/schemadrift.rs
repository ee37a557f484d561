//! schemadrift — the schema drift CLI
//!
//! # Usage
//!
//! ```bash
//! # Check the default database against models.toml
//! schemadrift check
//!
//! # Check a specific alias from the config file
//! schemadrift check --database analytics
//!
//! # Bypass the config file entirely
//! schemadrift check --database-url postgres://localhost/app
//! ```
//!
//! Exit code 0 when every check passes, 1 on any drift or fatal error.

use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use schemadrift::config::Config;
use schemadrift::expected::build_expected;
use schemadrift::introspect::LiveDb;
use schemadrift::reconcile::{reconcile, unregistered_models};
use schemadrift::registry::ModelSet;
use schemadrift::report;

#[derive(Parser)]
#[command(name = "schemadrift")]
#[command(version = "0.1.0")]
#[command(about = "Check declared models against the live database schema", long_about = None)]
#[command(after_help = "EXAMPLES:
    schemadrift check
    schemadrift check --database analytics --models models.toml
    schemadrift check --database-url postgres://localhost/app")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check correspondence between declared models and database tables
    Check {
        /// Database alias to check, resolved through the config file
        #[arg(long, default_value = "default")]
        database: String,

        /// Connection URL, bypassing the config file
        #[arg(long, env = "SCHEMADRIFT_DATABASE_URL")]
        database_url: Option<String>,

        /// Path to the declared models file (TOML or JSON)
        #[arg(long, default_value = "models.toml")]
        models: PathBuf,

        /// Path to the config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            database,
            database_url,
            models,
            config,
        } => match run_check(&database, database_url, &models, config.as_deref()).await {
            Ok(true) => {}
            Ok(false) => exit(1),
            Err(e) => {
                eprintln!("{} {}", "[ERROR]".red().bold(), e);
                exit(1);
            }
        },
    }
}

/// Run one check; `Ok(true)` means the schemas agree.
async fn run_check(
    alias: &str,
    database_url: Option<String>,
    models: &std::path::Path,
    config: Option<&std::path::Path>,
) -> Result<bool> {
    let url = match database_url {
        Some(url) => url,
        None => Config::load(config)?.url(alias)?.to_string(),
    };

    let db = LiveDb::connect(&url)
        .await
        .with_context(|| format!("checking database '{alias}'"))?;
    let profile = db.dialect().profile();

    let set = ModelSet::from_file(models)?;
    let expected = build_expected(&set, alias, profile)?;

    // Missing tables make column-level diffing meaningless; report them
    // and stop.
    let live_names = db.table_names().await?;
    let missing = unregistered_models(&expected, &live_names);
    if !missing.is_empty() {
        report::render_unregistered(&missing);
        return Ok(false);
    }

    let live = db.snapshot(&expected).await?;
    let drift = reconcile(&expected, &live, profile)?;

    if drift.is_empty() {
        report::render_success();
        Ok(true)
    } else {
        report::render_drift(&drift);
        Ok(false)
    }
}
