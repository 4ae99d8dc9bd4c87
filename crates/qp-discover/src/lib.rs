//! Loading code units from Rust sources.
//!
//! A unit is one module: a source file, or an inline `mod` block inside
//! one. Each unit records its free functions and the methods of its types,
//! with the `#[query_pattern]` declarations attached to them.
//!
//! - [`discover`] — Walk a project tree and load every source once
//! - [`load`] — Load an explicit list of modules
//! - [`parse`] — Turn one source text into units
mod parse;
mod walk;

pub use parse::*;
pub use walk::*;
