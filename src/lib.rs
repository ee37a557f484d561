//! # schemadrift — declared models vs. the real database
//!
//! schemadrift verifies that a set of declared data models (tables,
//! columns, column types) matches the schema actually present in a live
//! relational database. It is a CI / pre-deployment gate: loud and
//! specific on drift, silent on success. It never migrates or mutates
//! anything.
//!
//! ## How a check runs
//!
//! ```rust,ignore
//! use schemadrift::prelude::*;
//!
//! let set = ModelSet::from_file("models.toml".as_ref())?;
//! let db = LiveDb::connect("postgres://localhost/app").await?;
//! let profile = db.dialect().profile();
//!
//! let expected = build_expected(&set, "default", profile)?;
//! let live = db.snapshot(&expected).await?;
//! let report = reconcile(&expected, &live, profile)?;
//! assert!(report.is_empty());
//! ```
//!
//! Both sides are normalized into one canonical type vocabulary
//! ([`types::CanonicalType`]) through the active [`dialect::DialectProfile`]
//! before anything is compared, so `varchar(255)` and
//! `character varying(255)` agree and `tinyint(1)` means boolean where the
//! vendor says it does.

pub mod config;
pub mod dialect;
pub mod error;
pub mod expected;
pub mod introspect;
pub mod reconcile;
pub mod registry;
pub mod report;
pub mod schema;
pub mod types;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::dialect::{Dialect, DialectProfile};
    pub use crate::error::{DriftError, DriftResult};
    pub use crate::expected::build_expected;
    pub use crate::introspect::LiveDb;
    pub use crate::reconcile::{Discrepancy, reconcile, unregistered_models};
    pub use crate::registry::ModelSet;
    pub use crate::schema::{ColumnSpec, LiveSchema, LiveTable, ModelTable};
    pub use crate::types::{CanonicalType, ColumnType};
}
