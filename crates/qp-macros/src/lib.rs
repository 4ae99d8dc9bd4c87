//! The `#[query_pattern]` attribute.
//!
//! ```ignore
//! impl Repo {
//!     #[query_pattern(table = "users", columns = ["id", "email"])]
//!     fn find(&self, id: i64, email: &str) { /* ... */ }
//! }
//! ```
//!
//! The attribute leaves the function untouched. It only checks the
//! declaration at compile time; the `query-patterns` linter reads the
//! declarations back out of the source.
mod declare;

#[proc_macro_attribute]
pub fn query_pattern(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    match declare::expand(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

type Result<T> = syn::Result<T>;
