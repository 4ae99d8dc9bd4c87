use qp_core::{EXIT_COVERED, EXIT_MISSING};
use qp_pattern::{AccessPattern, IndexSet};
use qp_registry::{Collection, SitePath};

/// Whether a declared pattern is backed by an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Missing,
}

impl Status {
    pub fn is_missing(&self) -> bool {
        matches!(self, Status::Missing)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Missing => write!(f, "MISSING"),
        }
    }
}

/// Classifies each pattern, in input order, by exact (table, columns)
/// membership in the index set.
pub fn classify<'a, I>(patterns: I, indexes: &IndexSet) -> Vec<(Status, &'a AccessPattern)>
where
    I: IntoIterator<Item = &'a AccessPattern>,
{
    patterns
        .into_iter()
        .map(|pattern| match indexes.contains(pattern) {
            true => (Status::Ok, pattern),
            false => (Status::Missing, pattern),
        })
        .collect()
}

/// Outcome for one unique declared pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    status: Status,
    pattern: AccessPattern,
    sites: Vec<SitePath>,
}

impl Classification {
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn pattern(&self) -> &AccessPattern {
        &self.pattern
    }
    /// Call sites declaring the pattern.
    pub fn sites(&self) -> &[SitePath] {
        &self.sites
    }
    /// Number of call sites declaring the pattern; at least one.
    pub fn usage(&self) -> usize {
        self.sites.len().max(1)
    }
}

/// `[OK] users('id',) [usage=2]`
impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} [usage={}]", self.status, self.pattern, self.usage())
    }
}

/// Classifications for every unique pattern, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage(Vec<Classification>);

impl Coverage {
    pub fn iter(&self) -> impl Iterator<Item = &Classification> {
        self.0.iter()
    }
    pub fn missing(&self) -> impl Iterator<Item = &Classification> {
        self.0.iter().filter(|c| c.status.is_missing())
    }
    pub fn is_covered(&self) -> bool {
        self.missing().next().is_none()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Process exit status implied by the results.
    pub fn exit_code(&self) -> u8 {
        match self.is_covered() {
            true => EXIT_COVERED,
            false => EXIT_MISSING,
        }
    }
}

/// Classifies every collected pattern against the index set.
///
/// Pure: the same collection and index set always give the same coverage.
pub fn analyze(collection: &Collection, indexes: &IndexSet) -> Coverage {
    let coverage = classify(collection.patterns(), indexes)
        .into_iter()
        .map(|(status, pattern)| Classification {
            status,
            pattern: pattern.clone(),
            sites: collection.sites(pattern).to_vec(),
        })
        .collect::<Vec<Classification>>();
    log::debug!(
        "classified {} patterns against {} indexes",
        coverage.len(),
        indexes.len()
    );
    Coverage(coverage)
}
