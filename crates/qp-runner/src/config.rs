use super::*;
use qp_core::{DEFAULT_NAMESPACE, Error};
use qp_coverage::Reporter;
use std::path::PathBuf;

/// Which code units a run scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Units {
    /// Every source below the root.
    Discover(PathBuf),
    /// Only the named modules below the root.
    Modules { root: PathBuf, modules: Vec<String> },
}

/// Where a run reads real indexes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    Schema(PathBuf),
    Database { url: String, namespace: String },
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub units: Units,
    pub indexes: IndexSource,
    pub reporter: Reporter,
}

impl Config {
    /// Resolves command line arguments, rejecting incomplete source
    /// configuration and warning about options the chosen source ignores.
    pub fn from_args(args: &Args) -> Result<Self, Error> {
        let units = match args.modules.is_empty() {
            true => Units::Discover(args.root.clone()),
            false => Units::Modules {
                root: args.root.clone(),
                modules: args.modules.clone(),
            },
        };
        let indexes = match args.source {
            Source::Schema => {
                if args.namespace != DEFAULT_NAMESPACE {
                    log::warn!("--namespace is ignored with --source=schema");
                }
                if args.database_url.is_some() {
                    log::debug!("database url is ignored with --source=schema");
                }
                let path = args.schema.clone().ok_or_else(|| {
                    Error::Config("--source=schema requires --schema FILE".into())
                })?;
                IndexSource::Schema(path)
            }
            Source::Db => {
                if args.schema.is_some() {
                    log::warn!("--schema is ignored with --source=db");
                }
                let url = args
                    .database_url
                    .clone()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or_else(|| {
                        Error::Config("--source=db requires --database-url or DB_URL".into())
                    })?;
                if args.namespace.trim().is_empty() {
                    return Err(Error::Config("--namespace must not be empty".into()));
                }
                IndexSource::Database {
                    url,
                    namespace: args.namespace.clone(),
                }
            }
        };
        let reporter = Reporter::new(args.quiet)
            .with_color(!args.no_color)
            .with_sites(args.sites);
        Ok(Self {
            units,
            indexes,
            reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(argv: &[&str]) -> Result<Config, Error> {
        let args = Args::try_parse_from(std::iter::once("query-patterns").chain(argv.iter().copied()))
            .unwrap();
        Config::from_args(&args)
    }

    #[test]
    fn schema_source_requires_a_file() {
        assert!(matches!(config(&[]), Err(Error::Config(_))));
        let config = config(&["--schema", "schema.json"]).unwrap();
        assert_eq!(config.indexes, IndexSource::Schema("schema.json".into()));
        assert_eq!(config.units, Units::Discover(".".into()));
    }

    #[test]
    fn db_source_requires_a_url() {
        let config = config(&[
            "--source",
            "db",
            "--database-url",
            "postgres://localhost/app",
            "--namespace",
            "tenant",
            "--schema",
            "ignored.json",
        ])
        .unwrap();
        assert_eq!(
            config.indexes,
            IndexSource::Database {
                url: "postgres://localhost/app".into(),
                namespace: "tenant".into()
            }
        );
    }

    #[test]
    fn blank_url_is_missing() {
        let err = config(&["--source", "db", "--database-url", " "]).unwrap_err();
        assert!(matches!(err, Error::Config(s) if s.contains("DB_URL")));
    }

    #[test]
    fn modules_select_explicit_units() {
        let config = config(&["--root", "src", "--module", "repo", "--schema", "s.json"]).unwrap();
        assert_eq!(
            config.units,
            Units::Modules {
                root: "src".into(),
                modules: vec!["repo".into()]
            }
        );
    }
}
