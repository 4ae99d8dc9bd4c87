use super::*;
use colored::Colorize;
use std::io::Write;

/// Renders coverage results, one line per unique pattern.
///
/// `[OK]` lines are green and `[MISSING]` lines red when color is on.
/// Quiet mode drops `[OK]` lines; listing sites adds the declaring call
/// sites beneath each missing pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
    color: bool,
    sites: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            ..Self::default()
        }
    }
    pub fn with_color(self, color: bool) -> Self {
        Self { color, ..self }
    }
    pub fn with_sites(self, sites: bool) -> Self {
        Self { sites, ..self }
    }
    /// Report lines in discovery order.
    pub fn render(&self, coverage: &Coverage) -> Vec<String> {
        coverage
            .iter()
            .filter(|c| !(self.quiet && c.status() == Status::Ok))
            .flat_map(|c| {
                let head = match (self.color, c.status()) {
                    (false, _) => c.to_string(),
                    (true, Status::Ok) => c.to_string().green().to_string(),
                    (true, Status::Missing) => c.to_string().red().to_string(),
                };
                let tail = c
                    .sites()
                    .iter()
                    .filter(|_| self.sites && c.status().is_missing())
                    .map(|site| format!("    at {}", site));
                std::iter::once(head).chain(tail).collect::<Vec<String>>()
            })
            .collect()
    }
    /// Writes the report to `out`.
    pub fn write(&self, coverage: &Coverage, out: &mut impl Write) -> std::io::Result<()> {
        for line in self.render(coverage) {
            writeln!(out, "{}", line)?;
        }
        let missing = coverage.missing().count();
        match missing {
            0 => log::info!("all {} declared patterns are covered", coverage.len()),
            n => log::warn!("{} of {} declared patterns lack an index", n, coverage.len()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qp_pattern::{AccessPattern, IndexRecord, IndexSet};
    use qp_registry::{CodeUnit, collect};

    fn coverage() -> Coverage {
        let mut unit = CodeUnit::new("repo");
        let repo = unit.ty("Repo");
        repo.member("find_by_email")
            .attach(AccessPattern::new("sa_users", ["email"]).unwrap());
        repo.member("find_by_nickname")
            .attach(AccessPattern::new("sa_users", ["nickname"]).unwrap());
        repo.member("find_by_nickname2")
            .attach(AccessPattern::new("sa_users", ["nickname"]).unwrap());
        let collection = collect([&unit]).unwrap();
        let indexes = IndexSet::from_iter([IndexRecord::new("sa_users", ["email"])]);
        analyze(&collection, &indexes)
    }

    #[test]
    fn renders_every_pattern() {
        let lines = Reporter::new(false).render(&coverage());
        assert_eq!(
            lines,
            [
                "[OK] sa_users('email',) [usage=1]",
                "[MISSING] sa_users('nickname',) [usage=2]",
            ]
        );
    }

    #[test]
    fn quiet_hides_ok_lines() {
        let lines = Reporter::new(true).render(&coverage());
        assert_eq!(lines, ["[MISSING] sa_users('nickname',) [usage=2]"]);
    }

    #[test]
    fn lists_sites_of_missing_patterns() {
        let lines = Reporter::new(true).with_sites(true).render(&coverage());
        assert_eq!(
            lines,
            [
                "[MISSING] sa_users('nickname',) [usage=2]",
                "    at repo::Repo::find_by_nickname",
                "    at repo::Repo::find_by_nickname2",
            ]
        );
    }

    #[test]
    fn writes_lines_to_output() {
        let mut out = Vec::new();
        Reporter::new(false).write(&coverage(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("[OK] sa_users('email',)"));
    }
}
