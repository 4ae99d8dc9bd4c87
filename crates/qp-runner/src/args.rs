use clap::Parser;
use clap::ValueEnum;
use qp_core::{DB_URL, DEFAULT_NAMESPACE};
use std::path::PathBuf;

/// Where real indexes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// A JSON schema description file.
    Schema,
    /// A live PostgreSQL database.
    Db,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "query-patterns",
    version,
    about = "Check that every declared query access pattern is backed by an index"
)]
pub struct Args {
    /// Project root to discover sources under
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
    /// Check only these modules (repeatable), e.g. `app::repo` or `app/repo.rs`
    #[arg(long = "module", value_name = "MODULE")]
    pub modules: Vec<String>,
    /// Index source
    #[arg(long, value_enum, default_value_t = Source::Schema)]
    pub source: Source,
    /// Schema description, required with `--source schema`
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
    /// Database URL, required with `--source db`
    #[arg(long, value_name = "URL", env = DB_URL, hide_env_values = true)]
    pub database_url: Option<String>,
    /// Namespace to introspect with `--source db`
    #[arg(long, value_name = "NS", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
    /// Only report missing patterns
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Log progress in detail
    #[arg(short, long)]
    pub verbose: bool,
    /// List declaring call sites under each missing pattern
    #[arg(long)]
    pub sites: bool,
    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    pub fn level(&self) -> log::LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => log::LevelFilter::Warn,
            (_, true) => log::LevelFilter::Debug,
            _ => log::LevelFilter::Info,
        }
    }
}
