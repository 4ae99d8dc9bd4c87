use super::*;
use qp_core::Error;
use qp_pattern::{IndexRecord, IndexSet};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A schema description: tables and the indexes declared on them.
///
/// ```json
/// { "tables": [
///     { "table": "users",
///       "indexes": [ { "name": "ix_users_email", "columns": ["email"] } ] },
///     { "table": { "meta": { "db_table": "django_users" } },
///       "indexes": [ { "columns": [ { "name": "email" } ] } ] }
/// ] }
/// ```
///
/// Only declared indexes count; primary keys and unique constraints are
/// not implied.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    #[serde(skip)]
    origin: Option<PathBuf>,
    tables: Vec<TableDoc>,
}

#[derive(Debug, Clone, Deserialize)]
struct TableDoc {
    table: Value,
    #[serde(default)]
    indexes: Vec<IndexDoc>,
}

#[derive(Debug, Clone, Deserialize)]
struct IndexDoc {
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "fields")]
    columns: Vec<Value>,
}

impl Schema {
    pub fn parse(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Schema(e.to_string()))
    }
    pub fn load(path: &Path) -> Result<Self, Error> {
        log::debug!("reading schema description {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut schema = serde_json::from_str::<Self>(&text)
            .map_err(|e| Error::Schema(format!("{}: {}", path.display(), e)))?;
        schema.origin = Some(path.to_path_buf());
        Ok(schema)
    }
    /// Resolves every declared index into an [`IndexSet`].
    pub fn index_set(&self) -> Result<IndexSet, Error> {
        let mut set = IndexSet::new();
        for doc in self.tables.iter() {
            let origin = table_origin(&doc.table);
            let table = origin.resolve()?;
            if table.trim().is_empty() {
                return Err(Error::Schema("table name must not be empty".into()));
            }
            for index in doc.indexes.iter() {
                let columns = index
                    .columns
                    .iter()
                    .map(column_origin)
                    .map(|c| c.resolve().map(str::to_string))
                    .collect::<Result<Vec<String>, Error>>()?;
                if columns.is_empty() {
                    return Err(Error::Schema(format!(
                        "index {} on {} declares no columns",
                        index.name.as_deref().unwrap_or("<unnamed>"),
                        table
                    )));
                }
                set.insert(IndexRecord::new(table, columns), index.name.as_deref());
            }
        }
        log::debug!(
            "schema {} declares {} indexes",
            self.origin
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<inline>".to_string()),
            set.len()
        );
        Ok(set)
    }
}

#[async_trait::async_trait]
impl Indexes for Schema {
    async fn indexes(&self) -> Result<IndexSet, Error> {
        self.index_set()
    }
}
