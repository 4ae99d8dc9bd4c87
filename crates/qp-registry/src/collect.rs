use super::*;
use qp_core::Error;
use qp_pattern::AccessPattern;
use std::collections::HashMap;

/// Unique declared patterns across a scan, with the call sites using each.
///
/// `patterns` is in first-seen order for the given unit order. A pattern's
/// usage count is the number of distinct call sites declaring it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    patterns: Vec<AccessPattern>,
    sites: HashMap<AccessPattern, Vec<SitePath>>,
}

impl Collection {
    pub fn patterns(&self) -> &[AccessPattern] {
        &self.patterns
    }
    /// Number of call sites declaring the pattern; zero if never seen.
    pub fn count(&self, pattern: &AccessPattern) -> usize {
        self.sites.get(pattern).map_or(0, Vec::len)
    }
    /// Call sites declaring the pattern, in walk order.
    pub fn sites(&self, pattern: &AccessPattern) -> &[SitePath] {
        self.sites
            .get(pattern)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
    /// Pattern → usage count.
    pub fn counts(&self) -> HashMap<&AccessPattern, usize> {
        self.sites.iter().map(|(p, s)| (p, s.len())).collect()
    }
    pub fn len(&self) -> usize {
        self.patterns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
    fn record(&mut self, site: &CallSite) {
        for pattern in site.patterns() {
            if !self.sites.contains_key(pattern) {
                self.patterns.push(pattern.clone());
            }
            let sites = self.sites.entry(pattern.clone()).or_default();
            // attach keeps a site's list free of duplicates, but a site is
            // still only counted once per pattern
            if sites.last() != Some(site.path()) {
                sites.push(site.path().clone());
            }
        }
    }
}

/// Walks every callable of every unit and gathers declared patterns.
///
/// Free functions and the direct members of unit-scope types are visited
/// in declaration order. Units or callables without declarations are
/// normal; only a scan that finds nothing at all fails, with
/// [`Error::NoPatternsFound`].
pub fn collect<'a, I>(units: I) -> Result<Collection, Error>
where
    I: IntoIterator<Item = &'a CodeUnit>,
{
    let mut collection = Collection::default();
    let mut scanned = 0;
    for unit in units {
        scanned += 1;
        for site in unit.call_sites() {
            collection.record(site);
        }
    }
    log::debug!(
        "collected {} unique patterns from {} units",
        collection.len(),
        scanned
    );
    if collection.is_empty() {
        Err(Error::NoPatternsFound)
    } else {
        Ok(collection)
    }
}
