//! Classification of declared patterns against real indexes.
//!
//! - [`classify`] — Pure exact-tuple membership test per pattern
//! - [`analyze`] — Classification of a whole [`Collection`](qp_registry::Collection)
//! - [`Coverage`] — Ordered results with the exit status they imply
//! - [`Reporter`] — Line rendering, colors, and quiet mode
mod analyze;
mod report;

pub use analyze::*;
pub use report::*;
