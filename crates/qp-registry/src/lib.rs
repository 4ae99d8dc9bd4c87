//! Attachment of access patterns to call sites and their collection.
//!
//! Declarations live in an explicit side table: each [`CodeUnit`] owns the
//! [`CallSite`]s declared in it, keyed by [`SitePath`]. Nothing is registered
//! process-wide; the [`collect`] pass walks exactly the units it is handed.
//!
//! ## Core Types
//!
//! - [`SitePath`] — Stable identity of a function or method
//! - [`CallSite`] — Ordered, idempotent attachment list
//! - [`CodeUnit`] — One loaded module with its functions and types
//! - [`TypeDecl`] — A type at unit scope with its callable members
//! - [`Collection`] — Unique patterns in first-seen order with usage counts
mod collect;
mod site;
mod unit;

pub use collect::*;
pub use site::*;
pub use unit::*;
