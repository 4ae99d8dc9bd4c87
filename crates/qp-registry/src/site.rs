use qp_core::PATH_SEPARATOR;
use qp_pattern::AccessPattern;

/// Stable identity of a callable: the unit it lives in, the type that owns
/// it (for methods), and its name.
///
/// The owner is the impl's self type with its generic arguments, or
/// `<Type as Trait>` for a trait impl, so `impl Store<Pg>`,
/// `impl Store<Sqlite>` and `impl Finder for Store<Pg>` each own their
/// own methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SitePath {
    unit: String,
    owner: Option<String>,
    name: String,
}

impl SitePath {
    pub fn function(unit: &str, name: &str) -> Self {
        Self {
            unit: unit.to_string(),
            owner: None,
            name: name.to_string(),
        }
    }
    pub fn method(unit: &str, owner: &str, name: &str) -> Self {
        Self {
            unit: unit.to_string(),
            owner: Some(owner.to_string()),
            name: name.to_string(),
        }
    }
    pub fn unit(&self) -> &str {
        &self.unit
    }
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for SitePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.owner {
            Some(ref owner) => write!(
                f,
                "{}{sep}{}{sep}{}",
                self.unit,
                owner,
                self.name,
                sep = PATH_SEPARATOR
            ),
            None => write!(f, "{}{}{}", self.unit, PATH_SEPARATOR, self.name),
        }
    }
}

/// A function or method carrying zero or more declared patterns.
///
/// The attachment list is ordered and never holds two value-equal
/// patterns, so re-declaring a call site (a reload, a duplicated
/// attribute) converges to the same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    path: SitePath,
    patterns: Vec<AccessPattern>,
}

impl CallSite {
    pub fn new(path: SitePath) -> Self {
        Self {
            path,
            patterns: Vec::new(),
        }
    }
    pub fn path(&self) -> &SitePath {
        &self.path
    }
    /// Attached patterns in attachment order.
    pub fn patterns(&self) -> &[AccessPattern] {
        &self.patterns
    }
    /// Appends the pattern unless a value-equal one is already attached.
    /// Returns whether the list changed.
    pub fn attach(&mut self, pattern: AccessPattern) -> bool {
        if self.patterns.contains(&pattern) {
            log::trace!("{} already declares {}", self.path, pattern);
            false
        } else {
            self.patterns.push(pattern);
            true
        }
    }
    /// Applies declarations stacked on the callable, given in textual
    /// (top-to-bottom) order.
    ///
    /// The declaration nearest the callable is applied first, so the
    /// resulting order is last-applied-first: `#[a] #[b] fn f()` attaches
    /// `b` then `a`.
    pub fn stack<I>(&mut self, textual: I) -> usize
    where
        I: IntoIterator<Item = AccessPattern>,
        I::IntoIter: DoubleEndedIterator,
    {
        textual
            .into_iter()
            .rev()
            .map(|pattern| self.attach(pattern))
            .filter(|&attached| attached)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(table: &str, columns: &[&str]) -> AccessPattern {
        AccessPattern::new(table, columns.iter().copied()).unwrap()
    }

    #[test]
    fn attach_is_idempotent() {
        let mut once = CallSite::new(SitePath::method("repo", "Repo", "foo"));
        once.attach(pattern("t", &["a"]));
        let mut twice = CallSite::new(SitePath::method("repo", "Repo", "foo"));
        assert!(twice.attach(pattern("t", &["a"])));
        assert!(!twice.attach(pattern("t", &["a"])));
        assert_eq!(once, twice);
        assert_eq!(twice.patterns().len(), 1);
    }

    #[test]
    fn new_values_append_in_order() {
        let mut site = CallSite::new(SitePath::function("repo", "find"));
        site.attach(pattern("t", &["a"]));
        site.attach(pattern("t", &["a", "b"]));
        site.attach(pattern("t", &["b", "a"]));
        let columns = site
            .patterns()
            .iter()
            .map(|p| p.columns().join(","))
            .collect::<Vec<_>>();
        assert_eq!(columns, ["a", "a,b", "b,a"]);
    }

    #[test]
    fn stacked_declarations_are_last_applied_first() {
        let mut site = CallSite::new(SitePath::method("repo", "Repo", "foo"));
        let attached = site.stack([pattern("t", &["a"]), pattern("t", &["a", "b"])]);
        assert_eq!(attached, 2);
        assert_eq!(site.patterns()[0].columns(), ["a", "b"]);
        assert_eq!(site.patterns()[1].columns(), ["a"]);
    }

    #[test]
    fn restacking_converges() {
        let declarations = || [pattern("t", &["a"]), pattern("t", &["b"])];
        let mut site = CallSite::new(SitePath::function("repo", "find"));
        site.stack(declarations());
        let first = site.clone();
        assert_eq!(site.stack(declarations()), 0);
        assert_eq!(site, first);
    }

    #[test]
    fn trait_impl_owners_render_qualified() {
        let inherent = SitePath::method("repo", "Repo", "find");
        let bound = SitePath::method("repo", "<Repo as Finder>", "find");
        assert_ne!(inherent, bound);
        assert_eq!(bound.to_string(), "repo::<Repo as Finder>::find");
    }

    #[test]
    fn paths_render_qualified() {
        assert_eq!(SitePath::function("app::repo", "find").to_string(), "app::repo::find");
        assert_eq!(
            SitePath::method("app::repo", "Repo", "find").to_string(),
            "app::repo::Repo::find"
        );
    }
}
