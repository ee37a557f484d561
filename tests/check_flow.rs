//! End-to-end reconciliation over in-memory schemas: registry text in,
//! drift report out, no database required.

use pretty_assertions::assert_eq;

use schemadrift::dialect::Dialect;
use schemadrift::error::DriftError;
use schemadrift::expected::build_expected;
use schemadrift::reconcile::{Discrepancy, reconcile, unregistered_models};
use schemadrift::registry::ModelSet;
use schemadrift::schema::{LiveSchema, LiveTable};

const MODELS: &str = r#"
    [[apps]]
    name = "crm"

    [[apps.models]]
    name = "Customer"
    fields = [
        { name = "id", type = "serial" },
        { name = "name", type = "varchar(255)" },
        { name = "email", type = "varchar(255)" },
        { name = "active", type = "boolean" },
        { name = "joined", type = "timestamp with time zone" },
    ]

    [[apps.models.many_to_many]]
    name = "groups"
    to = "crm.Group"

    [[apps.models]]
    name = "Group"
    fields = [
        { name = "id", type = "serial" },
        { name = "title", type = "varchar(80)" },
    ]
"#;

fn postgres_live() -> LiveSchema {
    let mut live = LiveSchema::new();
    live.add_table(
        LiveTable::new("crm_customer")
            .column("id", "integer")
            .column("name", "character varying(255)")
            .column("email", "character varying(255)")
            .column("active", "boolean")
            .column("joined", "timestamp with time zone"),
    );
    live.add_table(
        LiveTable::new("crm_customer_groups")
            .column("id", "integer")
            .column("customer_id", "integer")
            .column("group_id", "integer"),
    );
    live.add_table(
        LiveTable::new("crm_group")
            .column("id", "integer")
            .column("title", "character varying(80)"),
    );
    live
}

fn live_table_names() -> Vec<String> {
    ["crm_customer", "crm_customer_groups", "crm_group"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn clean_schema_passes() {
    let set = ModelSet::from_toml(MODELS).unwrap();
    let profile = Dialect::Postgres.profile();
    let expected = build_expected(&set, "default", profile).unwrap();

    assert!(unregistered_models(&expected, &live_table_names()).is_empty());
    let report = reconcile(&expected, &postgres_live(), profile).unwrap();
    assert_eq!(report, vec![]);
}

#[test]
fn missing_tables_short_circuit() {
    let set = ModelSet::from_toml(MODELS).unwrap();
    let profile = Dialect::Postgres.profile();
    let expected = build_expected(&set, "default", profile).unwrap();

    // Only the customer table exists; the join table and group table are
    // gone.
    let names = vec!["crm_customer".to_string()];
    let missing = unregistered_models(&expected, &names);
    assert_eq!(missing.len(), 2);
    let models: Vec<&str> = missing.iter().map(|d| d.model()).collect();
    assert_eq!(models, ["crm.Customer.groups", "crm.Group"]);
}

#[test]
fn drifted_varchar_reports_length() {
    let set = ModelSet::from_toml(MODELS).unwrap();
    let profile = Dialect::Postgres.profile();
    let expected = build_expected(&set, "default", profile).unwrap();

    let mut live = postgres_live();
    live.add_table(
        LiveTable::new("crm_group")
            .column("id", "integer")
            .column("title", "character varying(120)"),
    );

    let report = reconcile(&expected, &live, profile).unwrap();
    assert_eq!(report.len(), 1);
    match &report[0] {
        Discrepancy::LengthMismatch {
            model,
            column,
            expected,
            actual,
            ..
        } => {
            assert_eq!(model, "crm.Group");
            assert_eq!(column, "title");
            assert_eq!((*expected, *actual), (80, 120));
        }
        other => panic!("expected LengthMismatch, got {other:?}"),
    }
}

#[test]
fn dropped_column_reports_set_mismatch_only() {
    let set = ModelSet::from_toml(MODELS).unwrap();
    let profile = Dialect::Postgres.profile();
    let expected = build_expected(&set, "default", profile).unwrap();

    let mut live = postgres_live();
    live.add_table(
        LiveTable::new("crm_customer")
            .column("id", "integer")
            .column("name", "text")
            .column("active", "boolean")
            .column("joined", "timestamp with time zone"),
    );

    let report = reconcile(&expected, &live, profile).unwrap();
    // One finding for the drifted table, none for the others, and no type
    // mismatch piled on top of the set mismatch.
    assert_eq!(report.len(), 1);
    match &report[0] {
        Discrepancy::ColumnSetMismatch {
            model,
            expected,
            actual,
            ..
        } => {
            assert_eq!(model, "crm.Customer");
            assert!(expected.contains(&"email".to_string()));
            assert!(!actual.contains(&"email".to_string()));
        }
        other => panic!("expected ColumnSetMismatch, got {other:?}"),
    }
}

#[test]
fn unknown_live_type_aborts() {
    let set = ModelSet::from_toml(MODELS).unwrap();
    let profile = Dialect::Postgres.profile();
    let expected = build_expected(&set, "default", profile).unwrap();

    let mut live = postgres_live();
    live.add_table(
        LiveTable::new("crm_customer")
            .column("id", "integer")
            .column("name", "enum('a','b')")
            .column("email", "character varying(255)")
            .column("active", "boolean")
            .column("joined", "timestamp with time zone"),
    );

    let err = reconcile(&expected, &live, profile).unwrap_err();
    match err {
        DriftError::UnknownType { model, column, raw } => {
            assert_eq!(model, "crm.Customer");
            assert_eq!(column, "name");
            assert_eq!(raw, "enum('a','b')");
        }
        other => panic!("expected UnknownType, got {other:?}"),
    }
}

#[test]
fn same_models_check_against_mysql() {
    // The same registry reconciles against a MySQL catalog when the MySQL
    // profile is threaded through; boolean comes back as tinyint(1) and
    // widths ride on column_type.
    let toml = r#"
        [[apps]]
        name = "crm"

        [[apps.models]]
        name = "Customer"
        fields = [
            { name = "id", type = "integer" },
            { name = "name", type = "varchar(255)" },
            { name = "active", type = "bool" },
            { name = "notes", type = "longtext" },
        ]
    "#;
    let set = ModelSet::from_toml(toml).unwrap();
    let profile = Dialect::MySql.profile();
    let expected = build_expected(&set, "default", profile).unwrap();

    let mut live = LiveSchema::new();
    live.add_table(
        LiveTable::new("crm_customer")
            .column("id", "int")
            .column("name", "varchar(255)")
            .column("active", "tinyint(1)")
            .column("notes", "longtext"),
    );

    let report = reconcile(&expected, &live, profile).unwrap();
    assert_eq!(report, vec![]);
}

#[test]
fn mysql_type_drift_is_reported() {
    let toml = r#"
        [[apps]]
        name = "crm"

        [[apps.models]]
        name = "Customer"
        fields = [
            { name = "id", type = "integer" },
            { name = "active", type = "bool" },
        ]
    "#;
    let set = ModelSet::from_toml(toml).unwrap();
    let profile = Dialect::MySql.profile();
    let expected = build_expected(&set, "default", profile).unwrap();

    let mut live = LiveSchema::new();
    live.add_table(
        LiveTable::new("crm_customer")
            .column("id", "int")
            .column("active", "smallint"),
    );

    let report = reconcile(&expected, &live, profile).unwrap();
    assert_eq!(report.len(), 1);
    assert!(matches!(
        &report[0],
        Discrepancy::TypeMismatch { column, .. } if column == "active"
    ));
}
