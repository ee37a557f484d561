//! The declared model registry.
//!
//! A `ModelSet` is the application's view of what the database should look
//! like: applications, their models, per-model fields with vendor type
//! strings, parent models for multi-table inheritance, and many-to-many
//! relations. Loaded from a TOML or JSON file (auto-detected by extension).
//!
//! # Example
//! ```
//! use schemadrift::registry::ModelSet;
//!
//! let toml = r#"
//!     [[apps]]
//!     name = "shop"
//!
//!     [[apps.models]]
//!     name = "Order"
//!     fields = [
//!         { name = "id", type = "integer" },
//!         { name = "status", type = "varchar(32)" },
//!     ]
//! "#;
//!
//! let set = ModelSet::from_toml(toml).unwrap();
//! assert_eq!(set.apps[0].models[0].table_name("shop"), "shop_order");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DriftError, DriftResult};

/// Every application and model to be checked against one database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSet {
    #[serde(default)]
    pub apps: Vec<AppDef>,
}

/// One application and the models belonging to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppDef {
    pub name: String,
    #[serde(default)]
    pub models: Vec<ModelDef>,
}

/// A declared model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDef {
    pub name: String,
    /// Physical table name; defaults to `<app>_<model-lowercased>`.
    #[serde(default)]
    pub db_table: Option<String>,
    /// Full field list, including fields inherited from parents. The
    /// expected-schema builder subtracts parent-owned columns.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    /// `app.Model` references to parent models (multi-table inheritance).
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub many_to_many: Vec<RelationDef>,
    /// Database aliases this model is synced to; absent means all.
    #[serde(default)]
    pub databases: Option<Vec<String>>,
}

/// A declared field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Column name override; defaults to the field name.
    #[serde(default)]
    pub column: Option<String>,
    /// Vendor type string, normalized against the active dialect profile.
    #[serde(rename = "type")]
    pub db_type: String,
}

/// A declared many-to-many relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationDef {
    pub name: String,
    /// `app.Model` reference to the other endpoint.
    pub to: String,
    /// Join table name; defaults to `<model_table>_<relation name>`.
    #[serde(default)]
    pub db_table: Option<String>,
    /// Whether the relation owns a join table. Relations through an
    /// explicit intermediate model set this to `false`.
    #[serde(default = "default_true")]
    pub creates_table: bool,
    /// Foreign-key column pointing at the owning model; defaults to
    /// `<model-lowercased>_id`.
    #[serde(default)]
    pub column: Option<String>,
    /// Foreign-key column pointing at the target model; defaults to
    /// `<target-lowercased>_id`.
    #[serde(default)]
    pub reverse_column: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a model set from a file path (format detected by extension:
    /// `.json` is JSON, everything else is TOML).
    pub fn from_file(path: &Path) -> DriftResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DriftError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
        .map_err(|e| DriftError::config(format!("{}: {}", path.display(), e)))
    }

    /// Load a model set from a TOML string.
    pub fn from_toml(input: &str) -> DriftResult<Self> {
        toml::from_str(input).map_err(|e| DriftError::config(e.to_string()))
    }

    /// Load a model set from a JSON string.
    pub fn from_json(input: &str) -> DriftResult<Self> {
        serde_json::from_str(input).map_err(|e| DriftError::config(e.to_string()))
    }

    /// Resolve an `app.Model` reference.
    pub fn find(&self, reference: &str) -> Option<(&AppDef, &ModelDef)> {
        let (app_name, model_name) = reference.split_once('.')?;
        let app = self.apps.iter().find(|a| a.name == app_name)?;
        let model = app.models.iter().find(|m| m.name == model_name)?;
        Some((app, model))
    }
}

impl AppDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Vec::new(),
        }
    }

    /// Builder: append a model.
    pub fn model(mut self, model: ModelDef) -> Self {
        self.models.push(model);
        self
    }
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_table: None,
            fields: Vec::new(),
            parents: Vec::new(),
            many_to_many: Vec::new(),
            databases: None,
        }
    }

    /// Builder: append a field with the column name defaulted.
    pub fn field(mut self, name: impl Into<String>, db_type: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            column: None,
            db_type: db_type.into(),
        });
        self
    }

    /// Physical table name for this model.
    pub fn table_name(&self, app: &str) -> String {
        match &self.db_table {
            Some(table) => table.clone(),
            None => format!("{}_{}", app, self.name.to_lowercase()),
        }
    }

    /// Human-readable `app.Model` label.
    pub fn label(&self, app: &str) -> String {
        format!("{}.{}", app, self.name)
    }

    /// Routing predicate: is this model synced to the given database alias?
    pub fn synced_to(&self, alias: &str) -> bool {
        match &self.databases {
            Some(aliases) => aliases.iter().any(|a| a == alias),
            None => true,
        }
    }
}

impl FieldDef {
    /// Column name, falling back to the field name.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

impl RelationDef {
    /// Join table name for a relation owned by `model_table`.
    pub fn table_name(&self, model_table: &str) -> String {
        match &self.db_table {
            Some(table) => table.clone(),
            None => format!("{}_{}", model_table, self.name),
        }
    }

    /// Foreign-key column pointing at the owning model.
    pub fn column_name(&self, model: &str) -> String {
        match &self.column {
            Some(column) => column.clone(),
            None => format!("{}_id", model.to_lowercase()),
        }
    }

    /// Foreign-key column pointing at the target model.
    pub fn reverse_column_name(&self) -> String {
        match &self.reverse_column {
            Some(column) => column.clone(),
            None => {
                let target = self.to.rsplit('.').next().unwrap_or(&self.to);
                format!("{}_id", target.to_lowercase())
            }
        }
    }
}
