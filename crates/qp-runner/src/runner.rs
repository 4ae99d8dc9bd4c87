use super::*;
use anyhow::Context;
use clap::Parser;
use qp_core::{EXIT_FAULT, EXIT_NOTHING, Error};
use qp_coverage::{Coverage, analyze};
use qp_registry::{CodeUnit, collect};
use qp_schema::{Indexes, Schema};
use std::io::{IsTerminal, Write};
use std::process::ExitCode;

/// Executes one check against a validated [`Config`].
pub struct Runner {
    config: Config,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Command line entry point: parse arguments, initialize logging, run,
    /// and map the outcome to an exit status.
    pub async fn main() -> ExitCode {
        let mut args = Args::parse();
        qp_core::log(args.level());
        args.no_color |= !std::io::stdout().is_terminal();
        let result = match Config::from_args(&args) {
            Ok(config) => Self::new(config).run(&mut std::io::stdout().lock()).await,
            Err(e) => Err(anyhow::Error::new(e)),
        };
        if let Err(ref e) = result {
            match Self::is_empty_scan(e) {
                true => log::warn!("{}", e.root_cause()),
                false => log::error!("{:#}", e),
            }
        }
        ExitCode::from(Self::exit_code(&result))
    }

    /// Full run: units, patterns, then the configured index source.
    pub async fn run(&self, out: &mut impl Write) -> anyhow::Result<Coverage> {
        let units = self.units()?;
        let collection = collect(&units)?;
        log::info!("collected {} unique patterns", collection.len());
        let source = self.source().await?;
        self.report(&collection, source.as_ref(), out).await
    }

    /// Full run against a caller-supplied index source instead of the
    /// configured one.
    pub async fn run_against<S>(&self, source: &S, out: &mut impl Write) -> anyhow::Result<Coverage>
    where
        S: Indexes + ?Sized,
    {
        let units = self.units()?;
        let collection = collect(&units)?;
        self.report(&collection, source, out).await
    }

    /// Loads the configured code units.
    pub fn units(&self) -> anyhow::Result<Vec<CodeUnit>> {
        match self.config.units {
            Units::Discover(ref root) => {
                log::info!("discovering sources under {}", root.display());
                qp_discover::discover(root)
                    .with_context(|| format!("discovering sources under {}", root.display()))
            }
            Units::Modules {
                ref root,
                ref modules,
            } => {
                log::info!("loading {} modules under {}", modules.len(), root.display());
                qp_discover::load(root, modules).context("loading modules")
            }
        }
    }

    /// Opens the configured index source.
    async fn source(&self) -> anyhow::Result<Box<dyn Indexes>> {
        match self.config.indexes {
            IndexSource::Schema(ref path) => {
                log::info!("reading indexes from {}", path.display());
                Ok(Box::new(Schema::load(path)?))
            }
            #[cfg(feature = "database")]
            IndexSource::Database {
                ref url,
                ref namespace,
            } => Ok(Box::new(qp_pg::Database::connect(url, namespace).await?)),
            #[cfg(not(feature = "database"))]
            IndexSource::Database { .. } => {
                Err(Error::Config("built without database support".into()).into())
            }
        }
    }

    async fn report<S>(
        &self,
        collection: &qp_registry::Collection,
        source: &S,
        out: &mut impl Write,
    ) -> anyhow::Result<Coverage>
    where
        S: Indexes + ?Sized,
    {
        let indexes = source.indexes().await.context("fetching indexes")?;
        log::debug!("index source holds {} indexes", indexes.len());
        let coverage = analyze(collection, &indexes);
        self.config
            .reporter
            .write(&coverage, out)
            .context("writing report")?;
        Ok(coverage)
    }

    fn is_empty_scan(e: &anyhow::Error) -> bool {
        e.downcast_ref::<Error>().is_some_and(Error::is_empty_scan)
    }

    /// Exit status of a finished run.
    pub fn exit_code(result: &anyhow::Result<Coverage>) -> u8 {
        match result {
            Ok(coverage) => coverage.exit_code(),
            Err(e) if Self::is_empty_scan(e) => EXIT_NOTHING,
            Err(_) => EXIT_FAULT,
        }
    }
}
