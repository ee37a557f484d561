//! Expected and live schema shapes.
//!
//! Both sides of the comparison are reduced to the same per-table
//! column/type shape before the reconciler sees them: the expected side as
//! [`ModelTable`]s of already-normalized [`ColumnSpec`]s, the live side as
//! [`LiveTable`]s of raw `(name, type string)` pairs normalized on demand.

use std::collections::{BTreeSet, HashMap};

use crate::types::ColumnType;

/// A declared column, already normalized into the canonical vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub ty: ColumnType,
}

/// A declared table as the application model intends it to exist.
///
/// Built once per run from the model registry; immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTable {
    /// Physical table name, already passed through the dialect's
    /// naming-convention converter.
    pub name: String,
    /// Human-readable `app.Model` label for reports.
    pub model: String,
    pub columns: Vec<ColumnSpec>,
}

impl ModelTable {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            columns: Vec::new(),
        }
    }

    /// Builder: append a column.
    pub fn column(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            ty,
        });
        self
    }

    /// Declared column names, order-insensitive.
    pub fn column_names(&self) -> BTreeSet<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// The introspected counterpart of a [`ModelTable`]: raw
/// `(column_name, raw_type_string)` pairs straight from the vendor catalog.
///
/// Produced fresh by introspection each run; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTable {
    pub name: String,
    pub columns: Vec<(String, String)>,
}

impl LiveTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Builder: append an introspected column.
    pub fn column(mut self, name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        self.columns.push((name.into(), raw_type.into()));
        self
    }

    /// Raw vendor type string for one column, if present.
    pub fn raw_type(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, raw)| raw.as_str())
    }

    /// Introspected column names, order-insensitive (duplicates collapse).
    pub fn column_names(&self) -> BTreeSet<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// All introspected tables for one run, keyed by physical name.
#[derive(Debug, Clone, Default)]
pub struct LiveSchema {
    tables: HashMap<String, LiveTable>,
}

impl LiveSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: LiveTable) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Option<&LiveTable> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
