//! Sources of real indexes.
//!
//! - [`Indexes`] — Async trait every index source implements
//! - [`Schema`] — Indexes declared in a JSON schema description
//!
//! The live-database source lives in `qp-pg`.
mod origin;
mod schema;
mod source;

pub use origin::*;
pub use schema::*;
pub use source::*;
