use super::*;
use qp_core::Error;

/// A declared intent to query a table by an ordered tuple of columns.
///
/// Equality and hashing are structural: two patterns are the same iff the
/// table matches and the columns match element-wise in order. `(a, b)` and
/// `(b, a)` are distinct patterns, exactly as they would be distinct
/// composite indexes. Repeated columns are kept as declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessPattern {
    table: String,
    columns: Vec<String>,
}

impl AccessPattern {
    /// Resolves the origins into a canonical pattern.
    ///
    /// Fails with [`Error::InvalidArgument`] on an empty table, an empty
    /// column list, or an empty column; with [`Error::UnsupportedOrigin`]
    /// if any origin is unrecognized.
    pub fn new<T, I, C>(table: T, columns: I) -> Result<Self, Error>
    where
        T: Into<TableOrigin>,
        I: IntoIterator<Item = C>,
        C: Into<ColumnOrigin>,
    {
        let table = table.into();
        let table = table.resolve()?;
        if table.trim().is_empty() {
            return Err(Error::InvalidArgument("table must not be empty".into()));
        }
        let columns = columns
            .into_iter()
            .map(Into::into)
            .map(|origin: ColumnOrigin| origin.resolve().map(str::to_string))
            .collect::<Result<Vec<String>, Error>>()?;
        if columns.is_empty() {
            return Err(Error::InvalidArgument("columns must not be empty".into()));
        }
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::InvalidArgument(format!(
                "column names must not be empty (table {})",
                table
            )));
        }
        Ok(Self {
            table: table.to_string(),
            columns,
        })
    }
    /// Pattern against a typed model's table.
    ///
    /// ```
    /// use qp_pattern::{AccessPattern, Model};
    ///
    /// struct Submission;
    /// impl Model for Submission {
    ///     const TABLENAME: &'static str = "user_mission_submissions";
    /// }
    ///
    /// let pattern = AccessPattern::of::<Submission>(["user_id", "mission_id"]).unwrap();
    /// assert_eq!(
    ///     pattern.to_string(),
    ///     "user_mission_submissions('user_id', 'mission_id')"
    /// );
    /// ```
    pub fn of<M: Model>(
        columns: impl IntoIterator<Item = impl Into<ColumnOrigin>>,
    ) -> Result<Self, Error> {
        Self::new(TableOrigin::model::<M>(), columns)
    }
    pub fn table(&self) -> &str {
        &self.table
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Renders `table('a', 'b')`, keeping the trailing comma of a
/// one-column tuple: `table('a',)`.
impl std::fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.table, Tuple(&self.columns))
    }
}

/// Tuple rendering shared by patterns and index records.
pub struct Tuple<'a>(pub &'a [String]);

impl std::fmt::Display for Tuple<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn quote(s: &str) -> String {
            if s.contains('\'') && !s.contains('"') {
                format!("\"{}\"", s.replace('\\', "\\\\"))
            } else {
                format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        }
        match self.0 {
            [one] => write!(f, "({},)", quote(one)),
            many => write!(
                f,
                "({})",
                many.iter()
                    .map(|c| quote(c))
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Submission;
    impl Model for Submission {
        const TABLENAME: &'static str = "user_mission_submissions";
    }

    #[test]
    fn keeps_declaration_order() {
        let p = AccessPattern::new("user_mission_submissions", ["user_id", "mission_id"]).unwrap();
        assert_eq!(p.table(), "user_mission_submissions");
        assert_eq!(p.columns(), ["user_id", "mission_id"]);
    }

    #[test]
    fn column_order_is_identity() {
        let ab = AccessPattern::new("t", ["a", "b"]).unwrap();
        let ba = AccessPattern::new("t", ["b", "a"]).unwrap();
        assert_ne!(ab, ba);
        assert_eq!(ab, AccessPattern::new("t", ["a", "b"]).unwrap());
    }

    #[test]
    fn repeated_columns_are_preserved() {
        let p = AccessPattern::new("t", ["a", "a"]).unwrap();
        assert_eq!(p.columns().len(), 2);
    }

    #[test]
    fn empty_table_is_invalid() {
        let err = AccessPattern::new("", ["a"]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn empty_columns_are_invalid() {
        let err = AccessPattern::new("t", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = AccessPattern::new("t", ["a", " "]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn unrecognized_table_is_unsupported() {
        let err = AccessPattern::new(TableOrigin::Unrecognized("i64".into()), ["a"]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOrigin(_)));
    }

    #[test]
    fn unrecognized_column_is_unsupported() {
        let columns = [ColumnOrigin::from("a"), ColumnOrigin::Unrecognized("f64".into())];
        let err = AccessPattern::new("t", columns).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOrigin(_)));
    }

    #[test]
    fn mixed_origins_normalize_to_names() {
        let table = TableOrigin::Nested {
            db_table: "django_users".into(),
        };
        let columns = [
            ColumnOrigin::Keyed { key: "id".into() },
            ColumnOrigin::Named {
                name: "email".into(),
            },
        ];
        let p = AccessPattern::new(table, columns).unwrap();
        assert_eq!(p, AccessPattern::new("django_users", ["id", "email"]).unwrap());
    }

    #[test]
    fn typed_model_pattern() {
        let p = AccessPattern::of::<Submission>(["user_id"]).unwrap();
        assert_eq!(p.table(), "user_mission_submissions");
    }

    #[test]
    fn renders_like_a_tuple() {
        let one = AccessPattern::new("app_user", ["email"]).unwrap();
        assert_eq!(one.to_string(), "app_user('email',)");
        let two = AccessPattern::new("users", ["id", "email"]).unwrap();
        assert_eq!(two.to_string(), "users('id', 'email')");
        let quoted = AccessPattern::new("t", ["o'brien"]).unwrap();
        assert_eq!(quoted.to_string(), "t(\"o'brien\",)");
    }
}
