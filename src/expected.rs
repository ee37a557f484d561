//! Expected-schema builder.
//!
//! Walks the declared [`ModelSet`] and produces the dialect-independent
//! expected schema: one [`ModelTable`] per routed model plus one synthetic
//! join table per table-owning many-to-many relation. Declared type strings
//! are normalized here, so an incomplete vocabulary fails before any
//! database work happens.

use std::collections::HashSet;

use crate::dialect::DialectProfile;
use crate::error::{DriftError, DriftResult};
use crate::registry::{AppDef, ModelDef, ModelSet, RelationDef};
use crate::schema::{ColumnSpec, ModelTable};
use crate::types::{CanonicalType, ColumnType};

/// Build the expected schema for one database alias.
///
/// Order is preserved: apps, then models as declared, each model's join
/// tables right after it.
pub fn build_expected(
    set: &ModelSet,
    db_alias: &str,
    profile: &DialectProfile,
) -> DriftResult<Vec<ModelTable>> {
    let mut tables = Vec::new();
    for app in &set.apps {
        for model in &app.models {
            if !model.synced_to(db_alias) {
                continue;
            }
            tables.push(model_table(set, app, model, profile)?);
            for relation in &model.many_to_many {
                if !relation.creates_table {
                    continue;
                }
                tables.push(join_table(app, model, relation, profile));
            }
        }
    }
    Ok(tables)
}

fn model_table(
    set: &ModelSet,
    app: &AppDef,
    model: &ModelDef,
    profile: &DialectProfile,
) -> DriftResult<ModelTable> {
    let label = model.label(&app.name);

    let mut columns = Vec::with_capacity(model.fields.len());
    for field in &model.fields {
        let name = field.column_name().to_string();
        let ty = profile
            .normalize(&field.db_type)
            .ok_or_else(|| DriftError::unknown_type(&label, &name, &field.db_type))?;
        columns.push(ColumnSpec { name, ty });
    }

    // Columns owned by a parent live physically in the parent's table,
    // not here.
    for reference in &model.parents {
        let (_, parent) = set.find(reference).ok_or_else(|| {
            DriftError::config(format!("model {label} lists unknown parent '{reference}'"))
        })?;
        let owned: HashSet<&str> = parent.fields.iter().map(|f| f.column_name()).collect();
        columns.retain(|c| !owned.contains(c.name.as_str()));
    }

    let mut seen = HashSet::new();
    for column in &columns {
        if !seen.insert(column.name.as_str()) {
            return Err(DriftError::config(format!(
                "model {label} declares column '{}' more than once",
                column.name
            )));
        }
    }

    Ok(ModelTable {
        name: profile.table_name(&model.table_name(&app.name)),
        model: label,
        columns,
    })
}

fn join_table(
    app: &AppDef,
    model: &ModelDef,
    relation: &RelationDef,
    profile: &DialectProfile,
) -> ModelTable {
    let owner_table = model.table_name(&app.name);
    let integer = ColumnType::plain(CanonicalType::Integer);
    ModelTable {
        name: profile.table_name(&relation.table_name(&owner_table)),
        model: format!("{}.{}", model.label(&app.name), relation.name),
        columns: vec![
            ColumnSpec {
                name: "id".to_string(),
                ty: integer,
            },
            ColumnSpec {
                name: relation.column_name(&model.name),
                ty: integer,
            },
            ColumnSpec {
                name: relation.reverse_column_name(),
                ty: integer,
            },
        ],
    }
}
