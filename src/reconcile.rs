//! The reconciler: expected vs. live schema, one verdict per table.
//!
//! Each table walks through the same fixed sequence of checks — presence,
//! column set, per-column types — and the first finding wins. A table with
//! a wrong column set never also reports type mismatches; the point is a
//! report without cascading noise.

use std::collections::HashSet;

use crate::dialect::DialectProfile;
use crate::error::{DriftError, DriftResult};
use crate::schema::{LiveSchema, ModelTable};
use crate::types::{CanonicalType, ColumnType};

/// One detected mismatch between the expected and live schema.
///
/// Collected into an ordered report; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// A declared model whose backing table is absent from the database.
    UnregisteredModel { model: String, table: String },
    /// The catalog lists the table but reports no columns for it
    /// (a view, or a table dropped mid-run).
    MissingTable { model: String, table: String },
    /// Declared and live column names differ; both sorted sets recorded.
    ColumnSetMismatch {
        model: String,
        table: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    /// A column's canonical type differs from the declared one.
    TypeMismatch {
        model: String,
        table: String,
        column: String,
        expected: ColumnType,
        actual: ColumnType,
        raw: String,
    },
    /// Canonical types matched but fixed-width lengths differ.
    LengthMismatch {
        model: String,
        table: String,
        column: String,
        expected: u32,
        actual: u32,
    },
}

impl Discrepancy {
    /// The `app.Model` label this finding is about.
    pub fn model(&self) -> &str {
        match self {
            Self::UnregisteredModel { model, .. }
            | Self::MissingTable { model, .. }
            | Self::ColumnSetMismatch { model, .. }
            | Self::TypeMismatch { model, .. }
            | Self::LengthMismatch { model, .. } => model,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnregisteredModel { .. } => "unregistered model",
            Self::MissingTable { .. } => "missing table",
            Self::ColumnSetMismatch { .. } => "column set mismatch",
            Self::TypeMismatch { .. } => "type mismatch",
            Self::LengthMismatch { .. } => "length mismatch",
        }
    }
}

/// Find declared tables absent from the live database entirely.
///
/// Run before reconciliation: if this is non-empty the whole check
/// short-circuits, since column-level diffing is meaningless without the
/// tables.
pub fn unregistered_models(expected: &[ModelTable], live_names: &[String]) -> Vec<Discrepancy> {
    let present: HashSet<&str> = live_names.iter().map(String::as_str).collect();
    expected
        .iter()
        .filter(|t| !present.contains(t.name.as_str()))
        .map(|t| Discrepancy::UnregisteredModel {
            model: t.model.clone(),
            table: t.name.clone(),
        })
        .collect()
}

/// Compare every expected table against the introspected snapshot.
///
/// Recoverable findings are collected and returned; an unknown live type
/// or a table missing from the snapshot aborts with an error.
pub fn reconcile(
    expected: &[ModelTable],
    live: &LiveSchema,
    profile: &DialectProfile,
) -> DriftResult<Vec<Discrepancy>> {
    let mut report = Vec::new();
    for table in expected {
        if let Some(finding) = check_table(table, live, profile)? {
            report.push(finding);
        }
    }
    Ok(report)
}

/// Evaluate one table; at most one finding comes back.
fn check_table(
    table: &ModelTable,
    live: &LiveSchema,
    profile: &DialectProfile,
) -> DriftResult<Option<Discrepancy>> {
    // Presence. Unregistered models were filtered out before introspection,
    // so a hole here means the enumeration and introspection pipelines
    // disagree about reality.
    let Some(actual) = live.get(&table.name) else {
        return Err(DriftError::Inconsistency {
            table: table.name.clone(),
        });
    };

    if actual.columns.is_empty() {
        return Ok(Some(Discrepancy::MissingTable {
            model: table.model.clone(),
            table: table.name.clone(),
        }));
    }

    // Column-set equality, order-insensitive.
    let expected_names = table.column_names();
    let actual_names = actual.column_names();
    if expected_names != actual_names {
        return Ok(Some(Discrepancy::ColumnSetMismatch {
            model: table.model.clone(),
            table: table.name.clone(),
            expected: expected_names.iter().map(|s| s.to_string()).collect(),
            actual: actual_names.iter().map(|s| s.to_string()).collect(),
        }));
    }

    // Per-column types. Set equality above guarantees every declared
    // column has a live counterpart.
    for column in &table.columns {
        let raw = actual
            .raw_type(&column.name)
            .ok_or_else(|| DriftError::Inconsistency {
                table: table.name.clone(),
            })?;
        let live_ty = profile
            .normalize(raw)
            .ok_or_else(|| DriftError::unknown_type(&table.model, &column.name, raw))?;

        if live_ty.base != column.ty.base {
            return Ok(Some(Discrepancy::TypeMismatch {
                model: table.model.clone(),
                table: table.name.clone(),
                column: column.name.clone(),
                expected: column.ty,
                actual: live_ty,
                raw: raw.to_string(),
            }));
        }

        if column.ty.base == CanonicalType::FixedString {
            if let (Some(expected), Some(actual)) = (column.ty.length, live_ty.length) {
                if expected != actual {
                    return Ok(Some(Discrepancy::LengthMismatch {
                        model: table.model.clone(),
                        table: table.name.clone(),
                        column: column.name.clone(),
                        expected,
                        actual,
                    }));
                }
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Dialect, DialectProfile};
    use crate::schema::{LiveTable, ModelTable};
    use crate::types::ColumnType;
    use pretty_assertions::assert_eq;

    fn profile() -> &'static DialectProfile {
        Dialect::Postgres.profile()
    }

    fn user_table() -> ModelTable {
        ModelTable::new("auth_user", "auth.User")
            .column("id", ColumnType::plain(CanonicalType::Integer))
            .column("name", ColumnType::fixed(255))
            .column("email", ColumnType::fixed(255))
    }

    fn live_user() -> LiveTable {
        LiveTable::new("auth_user")
            .column("id", "integer")
            .column("name", "character varying(255)")
            .column("email", "character varying(255)")
    }

    #[test]
    fn test_identical_schemas_yield_no_findings() {
        let mut live = LiveSchema::new();
        live.add_table(live_user());
        let report = reconcile(&[user_table()], &live, profile()).unwrap();
        assert_eq!(report, vec![]);
    }

    #[test]
    fn test_unregistered_models() {
        let expected = vec![user_table()];
        let missing = unregistered_models(&expected, &["other_table".to_string()]);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].model(), "auth.User");

        let present = unregistered_models(&expected, &["auth_user".to_string()]);
        assert!(present.is_empty());
    }

    #[test]
    fn test_missing_from_snapshot_is_fatal() {
        let live = LiveSchema::new();
        let err = reconcile(&[user_table()], &live, profile()).unwrap_err();
        assert!(matches!(err, DriftError::Inconsistency { table } if table == "auth_user"));
    }

    #[test]
    fn test_empty_table_reports_missing() {
        let mut live = LiveSchema::new();
        live.add_table(LiveTable::new("auth_user"));
        let report = reconcile(&[user_table()], &live, profile()).unwrap();
        assert!(matches!(&report[0], Discrepancy::MissingTable { table, .. } if table == "auth_user"));
    }

    #[test]
    fn test_column_set_mismatch_stops_the_table() {
        let mut live = LiveSchema::new();
        // email missing, and name's type is wrong too; only the set
        // mismatch must be reported.
        live.add_table(
            LiveTable::new("auth_user")
                .column("id", "integer")
                .column("name", "text"),
        );
        let report = reconcile(&[user_table()], &live, profile()).unwrap();
        assert_eq!(report.len(), 1);
        match &report[0] {
            Discrepancy::ColumnSetMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, &["email", "id", "name"]);
                assert_eq!(actual, &["id", "name"]);
            }
            other => panic!("expected ColumnSetMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch() {
        let mut live = LiveSchema::new();
        live.add_table(
            LiveTable::new("auth_user")
                .column("id", "integer")
                .column("name", "text")
                .column("email", "character varying(255)"),
        );
        let report = reconcile(&[user_table()], &live, profile()).unwrap();
        assert_eq!(report.len(), 1);
        match &report[0] {
            Discrepancy::TypeMismatch {
                column,
                expected,
                actual,
                raw,
                ..
            } => {
                assert_eq!(column, "name");
                assert_eq!(expected.base, CanonicalType::FixedString);
                assert_eq!(actual.base, CanonicalType::Text);
                assert_eq!(raw, "text");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let mut live = LiveSchema::new();
        live.add_table(
            LiveTable::new("auth_user")
                .column("id", "integer")
                .column("name", "character varying(255)")
                .column("email", "character varying(100)"),
        );
        let report = reconcile(&[user_table()], &live, profile()).unwrap();
        assert_eq!(report.len(), 1);
        match &report[0] {
            Discrepancy::LengthMismatch {
                column,
                expected,
                actual,
                ..
            } => {
                assert_eq!(column, "email");
                assert_eq!(*expected, 255);
                assert_eq!(*actual, 100);
            }
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_first_column_mismatch_wins() {
        let mut live = LiveSchema::new();
        // Both name and email drifted; only the first declared column's
        // finding is reported.
        live.add_table(
            LiveTable::new("auth_user")
                .column("id", "integer")
                .column("name", "character varying(100)")
                .column("email", "text"),
        );
        let report = reconcile(&[user_table()], &live, profile()).unwrap();
        assert_eq!(report.len(), 1);
        assert!(matches!(
            &report[0],
            Discrepancy::LengthMismatch { column, .. } if column == "name"
        ));
    }

    #[test]
    fn test_unknown_live_type_is_fatal() {
        let mut live = LiveSchema::new();
        live.add_table(
            LiveTable::new("auth_user")
                .column("id", "integer")
                .column("name", "enum('a','b')")
                .column("email", "character varying(255)"),
        );
        let err = reconcile(&[user_table()], &live, profile()).unwrap_err();
        match err {
            DriftError::UnknownType { model, column, raw } => {
                assert_eq!(model, "auth.User");
                assert_eq!(column, "name");
                assert_eq!(raw, "enum('a','b')");
            }
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_findings_are_per_table() {
        let orders = ModelTable::new("shop_order", "shop.Order")
            .column("id", ColumnType::plain(CanonicalType::Integer));
        let mut live = LiveSchema::new();
        live.add_table(live_user());
        live.add_table(LiveTable::new("shop_order").column("id", "text"));
        let report = reconcile(&[user_table(), orders], &live, profile()).unwrap();
        // Clean table contributes nothing; drifted table exactly one.
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].model(), "shop.Order");
    }
}
