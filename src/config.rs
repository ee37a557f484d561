//! Database-alias configuration.
//!
//! A small TOML file mapping aliases to connection URLs:
//!
//! ```toml
//! [databases]
//! default = "postgres://localhost/app"
//! analytics = "mysql://localhost/metrics"
//! ```
//!
//! Lookup order: an explicit `--config` path, `schemadrift.toml` in the
//! working directory, then `schemadrift/config.toml` under the user config
//! directory.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DriftError, DriftResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub databases: HashMap<String, String>,
}

impl Config {
    /// Load configuration, walking the lookup order. No file anywhere is
    /// not an error; alias resolution will fail later with a clear message.
    pub fn load(explicit: Option<&Path>) -> DriftResult<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        let local = Path::new("schemadrift.toml");
        if local.exists() {
            return Self::from_path(local);
        }

        if let Some(dir) = dirs::config_dir() {
            let path = dir.join("schemadrift").join("config.toml");
            if path.exists() {
                return Self::from_path(&path);
            }
        }

        Ok(Self::default())
    }

    fn from_path(path: &Path) -> DriftResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DriftError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| DriftError::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(input: &str) -> DriftResult<Self> {
        toml::from_str(input).map_err(|e| DriftError::config(e.to_string()))
    }

    /// Resolve a database alias to its connection URL.
    pub fn url(&self, alias: &str) -> DriftResult<&str> {
        self.databases
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| {
                DriftError::config(format!(
                    "no database '{alias}' in configuration; add it under [databases] or pass --database-url"
                ))
            })
    }
}
