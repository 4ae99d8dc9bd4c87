//! Declared query access patterns, checked against real indexes.
//!
//! Data access code declares which `(table, columns)` tuples it filters or
//! sorts by with [`query_pattern`]. The checker discovers those declarations
//! in a source tree, reduces them to unique patterns with usage counts, and
//! reports every pattern that no real index covers exactly.
//!
//! ```ignore
//! use query_patterns::query_pattern;
//!
//! impl Repo {
//!     #[query_pattern(table = "user_mission_submissions", columns = ["user_id", "mission_id"])]
//!     pub async fn submission(&self, user: i64, mission: i64) -> Option<Submission> { todo!() }
//! }
//! ```
//!
//! ## Crate Organization
//!
//! ### Model
//! - [`core`] — Error taxonomy, constants, and logging
//! - [`pattern`] — Access patterns, origins, and index records
//! - [`registry`] — Call-site attachment and collection
//!
//! ### Analysis
//! - [`coverage`] — Classification and reporting
//! - [`schema`] — Index sources and the JSON schema description
//! - [`discover`] — Source discovery and parsing
//!
//! ### Application
//! - [`runner`] — Configuration and the end-to-end check

pub use qp_core         as core;
pub use qp_pattern      as pattern;
pub use qp_registry     as registry;
pub use qp_coverage     as coverage;
pub use qp_schema       as schema;
pub use qp_discover     as discover;
#[cfg(feature = "cli")]
pub use qp_runner       as runner;

pub use qp_core::Error;
pub use qp_macros::query_pattern;
pub use qp_pattern::{AccessPattern, ColumnOrigin, IndexRecord, IndexSet, Model, TableOrigin};
