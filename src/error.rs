//! Error types for schemadrift.

use thiserror::Error;

/// The main error type for schema checks.
///
/// Everything here is fatal: the run aborts as soon as one of these is
/// raised. Recoverable findings (drifted tables, mismatched columns) are
/// collected as [`crate::reconcile::Discrepancy`] values instead.
#[derive(Debug, Error)]
pub enum DriftError {
    /// The connection URL names a vendor with no registered dialect profile.
    #[error("Unknown database vendor: '{0}'. Expected a postgres or mysql connection URL")]
    UnknownVendor(String),

    /// A type string matched no map entry and no fixed-width pattern.
    /// The vocabulary is incomplete, so the column cannot be soundly
    /// classified as matching or mismatching.
    #[error("Can't validate DB. Unknown field type in {model}.{column}: {raw}")]
    UnknownType {
        model: String,
        column: String,
        raw: String,
    },

    /// Model enumeration and table introspection disagree about which
    /// tables exist. Signals an internal invariant violation.
    #[error("Introspection inconsistency: table '{table}' was enumerated but could not be inspected")]
    Inconsistency { table: String },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Introspection query error.
    #[error("Query error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriftError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an unknown-type error for a model column.
    pub fn unknown_type(
        model: impl Into<String>,
        column: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self::UnknownType {
            model: model.into(),
            column: column.into(),
            raw: raw.into(),
        }
    }
}

/// Result type alias for schema checks.
pub type DriftResult<T> = Result<T, DriftError>;
