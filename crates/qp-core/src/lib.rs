//! Core error taxonomy, constants, and runtime utilities for query-patterns.
//!
//! Every other crate in the workspace reports failures through [`Error`],
//! so the binary can tell a misconfiguration from an engine fault from the
//! "nothing to check" outcome.
mod error;

pub use error::*;

// ============================================================================
// DISCOVERY PARAMETERS
// ============================================================================
/// Directory names never descended into while discovering source units.
pub const EXCLUDE_DIRS: &[&str] = &["target", ".git", "node_modules", "vendor", ".cargo"];
/// Source file extension of loadable units.
pub const SOURCE_EXTENSION: &str = "rs";
/// Attribute name that declares an access pattern on a call site.
pub const ATTRIBUTE: &str = "query_pattern";
/// Separator between segments of unit and call-site paths.
pub const PATH_SEPARATOR: &str = "::";

// ============================================================================
// INDEX SOURCE PARAMETERS
// ============================================================================
/// Environment variable holding the live database URL.
pub const DB_URL: &str = "DB_URL";
/// Namespace introspected when none is given.
pub const DEFAULT_NAMESPACE: &str = "public";

// ============================================================================
// EXIT STATUS
// ============================================================================
/// Every declared pattern is backed by an index.
pub const EXIT_COVERED: u8 = 0;
/// At least one declared pattern has no matching index.
pub const EXIT_MISSING: u8 = 1;
/// Configuration, discovery, or index source failure.
pub const EXIT_FAULT: u8 = 2;
/// Scan succeeded but found no declarations.
pub const EXIT_NOTHING: u8 = 3;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize terminal logging on stderr.
///
/// Report output owns stdout, so every log record goes to stderr regardless
/// of level. Safe to call more than once; later calls are ignored.
#[cfg(feature = "logging")]
pub fn log(level: log::LevelFilter) {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .set_time_level(log::LevelFilter::Off)
        .build();
    let _ = simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
}
