use super::Result;
use proc_macro2::{Span, TokenStream};
use quote::ToTokens;
use syn::parse::Parser;
use syn::{Expr, ExprArray, ExprLit, ItemFn, Lit, TraitItemFn};

/// Validates the declaration and hands back the function unchanged.
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let mut table: Option<Expr> = None;
    let mut columns: Option<ExprArray> = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("table") {
            if table.is_some() {
                return Err(meta.error("duplicate `table`"));
            }
            table = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("columns") {
            if columns.is_some() {
                return Err(meta.error("duplicate `columns`"));
            }
            columns = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported property, expected `table` or `columns`"))
        }
    });
    parser.parse2(attr)?;

    let table = table.ok_or_else(|| syn::Error::new(Span::call_site(), "missing `table = \"...\"`"))?;
    let columns =
        columns.ok_or_else(|| syn::Error::new(Span::call_site(), "missing `columns = [...]`"))?;
    name(&table, "table")?;
    if columns.elems.is_empty() {
        return Err(syn::Error::new_spanned(&columns, "columns must not be empty"));
    }
    for column in columns.elems.iter() {
        name(column, "column")?;
    }

    match syn::parse2::<ItemFn>(item.clone()) {
        Ok(function) => Ok(function.into_token_stream()),
        Err(_) => syn::parse2::<TraitItemFn>(item)
            .map(ToTokens::into_token_stream)
            .map_err(|e| {
                syn::Error::new(e.span(), "#[query_pattern] applies to functions and methods")
            }),
    }
}

/// Names are non-empty string literals. A constant or any other expression
/// cannot be read back out of the source, so it is rejected here.
fn name(expr: &Expr, what: &str) -> Result<()> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) if s.value().trim().is_empty() => Err(syn::Error::new_spanned(
            expr,
            format!("{} must not be empty", what),
        )),
        Expr::Lit(ExprLit {
            lit: Lit::Str(_), ..
        }) => Ok(()),
        _ => Err(syn::Error::new_spanned(
            expr,
            format!("{} must be a string literal", what),
        )),
    }
}
