use qp_core::Error;

/// A Rust type backed by a database table.
///
/// Implementing this lets call sites declare patterns against the type
/// instead of repeating the table name as a string.
pub trait Model {
    /// Physical table name.
    const TABLENAME: &'static str;
}

/// The raw value a caller supplies for a pattern's table.
///
/// # Variants
///
/// - `Name` — Plain table name
/// - `Declarative` — Model exposing its table name directly
/// - `Core` — Table object exposing a name alongside its columns
/// - `Nested` — Model exposing the physical name through nested metadata
/// - `Unrecognized` — Anything else, described for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOrigin {
    Name(String),
    Declarative { tablename: String },
    Core { name: String, columns: Vec<String> },
    Nested { db_table: String },
    Unrecognized(String),
}

impl TableOrigin {
    /// Declarative origin of a typed model.
    pub fn model<M: Model>() -> Self {
        Self::Declarative {
            tablename: M::TABLENAME.to_string(),
        }
    }
    /// Canonical table name. Empty names are left to the caller to reject.
    pub fn resolve(&self) -> Result<&str, Error> {
        match self {
            Self::Name(name) => Ok(name),
            Self::Declarative { tablename } => Ok(tablename),
            Self::Core { name, .. } => Ok(name),
            Self::Nested { db_table } => Ok(db_table),
            Self::Unrecognized(kind) => Err(Error::UnsupportedOrigin(format!(
                "table origin of type {}",
                kind
            ))),
        }
    }
}

impl From<&str> for TableOrigin {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}
impl From<String> for TableOrigin {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// The raw value a caller supplies for one column of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOrigin {
    Name(String),
    Keyed { key: String },
    Named { name: String },
    Unrecognized(String),
}

impl ColumnOrigin {
    pub fn resolve(&self) -> Result<&str, Error> {
        match self {
            Self::Name(name) => Ok(name),
            Self::Keyed { key } => Ok(key),
            Self::Named { name } => Ok(name),
            Self::Unrecognized(kind) => Err(Error::UnsupportedOrigin(format!(
                "column origin of type {}",
                kind
            ))),
        }
    }
}

impl From<&str> for ColumnOrigin {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}
impl From<String> for ColumnOrigin {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}
impl From<&String> for ColumnOrigin {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}
