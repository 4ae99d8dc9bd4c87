//! The query-patterns check, end to end.
//!
//! A run always proceeds in the same order: validate configuration, obtain
//! code units, collect declared patterns, fetch real indexes, classify, and
//! report. No index source is opened until collection has succeeded.
//!
//! - [`Args`] — Command line surface
//! - [`Config`] — Validated run configuration
//! - [`Runner`] — Executes one run and maps its outcome to an exit status
mod args;
mod config;
mod runner;

pub use args::*;
pub use config::*;
pub use runner::*;
