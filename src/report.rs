//! Report rendering.
//!
//! Category-prefixed, colorized lines on stdout. The shape is stable
//! enough to grep in CI logs, but there is no machine-readable format.

use colored::Colorize;

use crate::reconcile::Discrepancy;

/// Sorted, comma-separated rendering of a column list.
pub fn pretty_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut sorted: Vec<&str> = items.iter().map(|s| s.as_ref()).collect();
    sorted.sort_unstable();
    sorted.join(", ")
}

/// Render the unregistered-model short-circuit report.
pub fn render_unregistered(missing: &[Discrepancy]) {
    println!("{}", "[ERROR] Migration is needed".red().bold());
    println!("Unregistered models:");
    for finding in missing {
        if let Discrepancy::UnregisteredModel { model, table } = finding {
            println!(" {model} (table '{table}')");
        }
    }
}

/// Render the drift report produced by reconciliation.
pub fn render_drift(report: &[Discrepancy]) {
    for finding in report {
        match finding {
            Discrepancy::UnregisteredModel { model, table } => {
                println!(
                    "{} {model}",
                    "[ERROR] Model has no backing table:".red()
                );
                println!(" Table:              {table}");
            }
            Discrepancy::MissingTable { model, table } => {
                println!(
                    "{} {model}",
                    "[ERROR] Table has no columns in the database:".red()
                );
                println!(" Table:              {table}");
            }
            Discrepancy::ColumnSetMismatch {
                model,
                expected,
                actual,
                ..
            } => {
                println!(
                    "{} {model}",
                    "[ERROR] Model fields are out of sync:".red()
                );
                println!(" Model fields:       {}", pretty_list(expected));
                println!(" Database columns:   {}", pretty_list(actual));
            }
            Discrepancy::TypeMismatch {
                model,
                column,
                expected,
                raw,
                ..
            } => {
                println!(
                    "{} '{model}'",
                    "[ERROR] Inconsistent field type in model".red()
                );
                println!(" Model field:        {column} {expected}");
                println!(" Database column:    {column} {raw}");
            }
            Discrepancy::LengthMismatch {
                model,
                column,
                expected,
                actual,
                ..
            } => {
                println!(
                    "{} '{model}'",
                    "[ERROR] Inconsistent varchar length in model".red()
                );
                println!(" Model field:        {column} {expected}");
                println!(" Database column:    {column} {actual}");
            }
        }
    }

    println!("{}", "[ERROR] Migration is needed".red().bold());
    println!(" Models out of sync:");
    let mut models: Vec<&str> = report.iter().map(|d| d.model()).collect();
    models.sort_unstable();
    models.dedup();
    for model in models {
        println!(" {model}");
    }
}

/// Render the all-clear line.
pub fn render_success() {
    println!("{}", "[OK] Schema checks passed".green());
}
