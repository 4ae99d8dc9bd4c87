//! Query Pattern Check
//!
//! Discovers `#[query_pattern]` declarations and reports each pattern that
//! no real index covers.
//!
//! Exit status: 0 covered, 1 missing, 2 fault, 3 nothing declared.

#[tokio::main]
async fn main() -> std::process::ExitCode {
    query_patterns::runner::Runner::main().await
}
