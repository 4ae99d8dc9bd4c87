//! Declared access patterns and the real indexes they are checked against.
//!
//! ## Core Types
//!
//! - [`AccessPattern`] — Immutable (table, ordered columns) declaration
//! - [`TableOrigin`] — Recognized shapes a table can be supplied in
//! - [`ColumnOrigin`] — Recognized shapes a column can be supplied in
//! - [`Model`] — Typed table declaration for Rust models
//! - [`IndexRecord`] — One real index as (table, ordered columns)
//! - [`IndexSet`] — Set of real indexes with exact tuple lookup
mod index;
mod origin;
mod pattern;

pub use index::*;
pub use origin::*;
pub use pattern::*;
