/// Failures surfaced by the registry, collection, and index source layers.
///
/// All variants are fail-fast: nothing in the engine catches one and keeps
/// going. A pattern classified as missing is an outcome, not an error, and
/// never appears here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Empty table name or empty column list at pattern construction.
    InvalidArgument(String),
    /// A table or column origin matched none of the recognized shapes.
    UnsupportedOrigin(String),
    /// Units were scanned but carried no declarations.
    NoPatternsFound,
    /// Discovery located zero units under the given location.
    NoUnitsFound(String),
    /// A source unit could not be parsed.
    Parse { path: String, message: String },
    /// A file could not be read.
    Io { path: String, message: String },
    /// Schema description unreadable or malformed.
    Schema(String),
    /// Database connection or introspection failure.
    Database(String),
    /// Missing or contradictory configuration.
    Config(String),
}

impl Error {
    /// True for the "nothing to check" outcome, as opposed to a fault.
    pub fn is_empty_scan(&self) -> bool {
        matches!(self, Self::NoPatternsFound)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(s) => write!(f, "invalid argument: {}", s),
            Self::UnsupportedOrigin(s) => write!(f, "unsupported origin: {}", s),
            Self::NoPatternsFound => write!(f, "no #[query_pattern] declarations found"),
            Self::NoUnitsFound(s) => write!(f, "no units found to scan in {}", s),
            Self::Parse { path, message } => write!(f, "failed to parse {}: {}", path, message),
            Self::Io { path, message } => write!(f, "failed to read {}: {}", path, message),
            Self::Schema(s) => write!(f, "schema error: {}", s),
            Self::Database(s) => write!(f, "database error: {}", s),
            Self::Config(s) => write!(f, "configuration error: {}", s),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = Error::UnsupportedOrigin("number".into());
        assert_eq!(err.to_string(), "unsupported origin: number");
        let err = Error::Parse {
            path: "src/repo.rs".into(),
            message: "expected `fn`".into(),
        };
        assert_eq!(err.to_string(), "failed to parse src/repo.rs: expected `fn`");
    }

    #[test]
    fn only_no_patterns_is_an_empty_scan() {
        assert!(Error::NoPatternsFound.is_empty_scan());
        assert!(!Error::NoUnitsFound(".".into()).is_empty_scan());
        assert!(!Error::Config("--schema".into()).is_empty_scan());
    }
}
