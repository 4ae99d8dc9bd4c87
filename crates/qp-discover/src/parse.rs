use qp_core::{ATTRIBUTE, Error, PATH_SEPARATOR};
use qp_pattern::{AccessPattern, ColumnOrigin, TableOrigin};
use qp_registry::{CodeUnit, SitePath};
use quote::ToTokens;
use syn::{
    Attribute, Expr, ExprLit, GenericArgument, ImplItem, Item, ItemImpl, Lit, PathArguments,
    TraitItem, Type,
};

/// Parses one source text into the unit it defines, followed by the units
/// of its inline `mod` blocks.
///
/// Free functions and the methods of `impl` blocks and traits at unit scope
/// are recorded in declaration order, with their stacked `#[query_pattern]`
/// declarations attached nearest-first. Unparseable source is
/// [`Error::Parse`]; a malformed declaration is [`Error::InvalidArgument`]
/// or [`Error::UnsupportedOrigin`] naming the declaring site.
pub fn parse(name: &str, text: &str) -> Result<Vec<CodeUnit>, Error> {
    let file = syn::parse_file(text).map_err(|e| Error::Parse {
        path: name.to_string(),
        message: e.to_string(),
    })?;
    let mut units = Vec::new();
    unit(name, &file.items, &mut units)?;
    Ok(units)
}

fn unit(name: &str, items: &[Item], units: &mut Vec<CodeUnit>) -> Result<(), Error> {
    let mut unit = CodeUnit::new(name);
    let mut nested = Vec::new();
    for item in items {
        match item {
            Item::Fn(f) => {
                let function = f.sig.ident.to_string();
                let site = SitePath::function(name, &function);
                let patterns = declarations(&f.attrs, &site)?;
                unit.function(&function).stack(patterns);
            }
            Item::Struct(s) => {
                unit.ty(&s.ident.to_string());
            }
            Item::Enum(e) => {
                unit.ty(&e.ident.to_string());
            }
            Item::Union(u) => {
                unit.ty(&u.ident.to_string());
            }
            Item::Impl(block) => {
                let owner = owner(block);
                for member in block.items.iter() {
                    if let ImplItem::Fn(method) = member {
                        let method_name = method.sig.ident.to_string();
                        let site = SitePath::method(name, &owner, &method_name);
                        let patterns = declarations(&method.attrs, &site)?;
                        unit.ty(&owner).member(&method_name).stack(patterns);
                    }
                }
            }
            Item::Trait(t) => {
                let owner = t.ident.to_string();
                unit.ty(&owner);
                for member in t.items.iter() {
                    if let TraitItem::Fn(method) = member {
                        let method_name = method.sig.ident.to_string();
                        let site = SitePath::method(name, &owner, &method_name);
                        let patterns = declarations(&method.attrs, &site)?;
                        unit.ty(&owner).member(&method_name).stack(patterns);
                    }
                }
            }
            Item::Mod(module) => {
                if let Some((_, ref content)) = module.content {
                    nested.push((
                        format!("{}{}{}", name, PATH_SEPARATOR, module.ident),
                        content,
                    ));
                }
            }
            _ => {}
        }
    }
    units.push(unit);
    for (name, items) in nested {
        self::unit(&name, items, units)?;
    }
    Ok(())
}

/// Owner of an `impl` block's methods: the self type with its generic
/// arguments, as `<Type as Trait>` for trait impls. Distinct impls of one
/// type never share a call site.
fn owner(block: &ItemImpl) -> String {
    let ty = render(&block.self_ty);
    match block.trait_ {
        Some((_, ref path, _)) => format!("<{} as {}>", ty, segment(path)),
        None => ty,
    }
}

fn render(ty: &Type) -> String {
    match ty {
        Type::Path(path) if path.qself.is_none() => segment(&path.path),
        Type::Reference(r) => match r.mutability {
            Some(_) => format!("&mut {}", render(&r.elem)),
            None => format!("&{}", render(&r.elem)),
        },
        other => other.to_token_stream().to_string(),
    }
}

/// Last path segment with its generic arguments: `db::Store<Pg>` is `Store<Pg>`.
fn segment(path: &syn::Path) -> String {
    let Some(last) = path.segments.last() else {
        return path.to_token_stream().to_string();
    };
    match last.arguments {
        PathArguments::AngleBracketed(ref generics) => format!(
            "{}<{}>",
            last.ident,
            generics
                .args
                .iter()
                .map(|arg| match arg {
                    GenericArgument::Type(ty) => render(ty),
                    other => other.to_token_stream().to_string(),
                })
                .collect::<Vec<String>>()
                .join(", ")
        ),
        _ => last.ident.to_string(),
    }
}

/// Declarations attached to an item, in textual order.
fn declarations(attrs: &[Attribute], site: &SitePath) -> Result<Vec<AccessPattern>, Error> {
    attrs
        .iter()
        .filter(|attr| {
            attr.path()
                .segments
                .last()
                .is_some_and(|segment| segment.ident == ATTRIBUTE)
        })
        .map(|attr| declaration(attr, site))
        .collect()
}

fn declaration(attr: &Attribute, site: &SitePath) -> Result<AccessPattern, Error> {
    let mut table: Option<Expr> = None;
    let mut columns: Option<Expr> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("table") {
            table = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("columns") {
            columns = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported property, expected `table` or `columns`"))
        }
    })
    .map_err(|e| Error::InvalidArgument(format!("{}: {}", site, e)))?;
    let table = table
        .ok_or_else(|| Error::InvalidArgument(format!("{}: declaration has no table", site)))?;
    let columns = columns
        .ok_or_else(|| Error::InvalidArgument(format!("{}: declaration has no columns", site)))?;
    let columns = match columns {
        Expr::Array(array) => array.elems.iter().map(column_origin).collect(),
        other => vec![ColumnOrigin::Unrecognized(describe(&other))],
    };
    AccessPattern::new(table_origin(&table), columns).map_err(|e| match e {
        Error::InvalidArgument(s) => Error::InvalidArgument(format!("{}: {}", site, s)),
        Error::UnsupportedOrigin(s) => Error::UnsupportedOrigin(format!("{}: {}", site, s)),
        other => other,
    })
}

/// Only string literals name a table statically.
fn table_origin(expr: &Expr) -> TableOrigin {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => TableOrigin::Name(s.value()),
        other => TableOrigin::Unrecognized(describe(other)),
    }
}

fn column_origin(expr: &Expr) -> ColumnOrigin {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => ColumnOrigin::Name(s.value()),
        other => ColumnOrigin::Unrecognized(describe(other)),
    }
}

/// Descriptive kind of an expression for diagnostics.
fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Path(path) => format!("path `{}`", path.to_token_stream()),
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Int(_) => "integer literal".to_string(),
            Lit::Float(_) => "float literal".to_string(),
            Lit::Bool(_) => "bool literal".to_string(),
            Lit::Char(_) => "char literal".to_string(),
            Lit::ByteStr(_) | Lit::Byte(_) => "byte literal".to_string(),
            _ => "literal".to_string(),
        },
        Expr::Array(_) => "array".to_string(),
        other => format!("expression `{}`", other.to_token_stream()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qp_registry::collect;

    fn patterns(unit: &CodeUnit) -> Vec<(String, String)> {
        unit.call_sites()
            .flat_map(|site| {
                site.patterns()
                    .iter()
                    .map(move |p| (site.path().to_string(), p.to_string()))
            })
            .collect()
    }

    #[test]
    fn reads_method_declarations() {
        let units = parse(
            "app::repo",
            r#"
            use query_patterns::query_pattern;
            pub struct Repo;
            impl Repo {
                #[query_pattern(table = "user_mission_submissions", columns = ["user_id", "mission_id"])]
                pub fn foo(&self) {}
                pub fn plain(&self) {}
            }
            "#,
        )
        .unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(
            patterns(&units[0]),
            [(
                "app::repo::Repo::foo".to_string(),
                "user_mission_submissions('user_id', 'mission_id')".to_string()
            )]
        );
    }

    #[test]
    fn reads_free_functions_and_qualified_attributes() {
        let units = parse(
            "repo",
            r#"
            #[query_patterns::query_pattern(table = "users", columns = ["id"])]
            fn foo() {}
            "#,
        )
        .unwrap();
        assert_eq!(
            patterns(&units[0]),
            [("repo::foo".to_string(), "users('id',)".to_string())]
        );
    }

    #[test]
    fn stacked_declarations_are_last_applied_first() {
        let units = parse(
            "repo",
            r#"
            struct Repo;
            impl Repo {
                #[query_pattern(table = "t", columns = ["a"])]
                #[query_pattern(table = "t", columns = ["a", "b"])]
                fn foo(&self) {}
            }
            "#,
        )
        .unwrap();
        let columns = units[0]
            .call_sites()
            .flat_map(|s| s.patterns().iter().map(|p| p.columns().len()))
            .collect::<Vec<_>>();
        assert_eq!(columns, [2, 1]);
    }

    #[test]
    fn duplicated_declarations_attach_once() {
        let units = parse(
            "repo",
            r#"
            #[query_pattern(table = "users", columns = ["id"])]
            #[query_pattern(table = "users", columns = ["id"])]
            fn foo() {}
            "#,
        )
        .unwrap();
        assert_eq!(patterns(&units[0]).len(), 1);
    }

    #[test]
    fn trait_methods_and_split_impls_share_the_type() {
        let units = parse(
            "repo",
            r#"
            trait Finder {
                #[query_pattern(table = "users", columns = ["email"])]
                fn by_email(&self) {}
            }
            struct Repo;
            impl Repo {
                #[query_pattern(table = "users", columns = ["id"])]
                fn by_id(&self) {}
            }
            impl Finder for Repo {}
            impl Repo {
                #[query_pattern(table = "users", columns = ["name"])]
                fn by_name(&self) {}
            }
            "#,
        )
        .unwrap();
        let sites = patterns(&units[0])
            .into_iter()
            .map(|(site, _)| site)
            .collect::<Vec<_>>();
        assert_eq!(
            sites,
            ["repo::Finder::by_email", "repo::Repo::by_id", "repo::Repo::by_name"]
        );
    }

    #[test]
    fn trait_and_inherent_methods_are_distinct_sites() {
        let units = parse(
            "repo",
            r#"
            struct Repo;
            trait Finder { fn find(&self); }
            impl Repo {
                #[query_pattern(table = "users", columns = ["id"])]
                fn find(&self) {}
            }
            impl Finder for Repo {
                #[query_pattern(table = "users", columns = ["id"])]
                fn find(&self) {}
            }
            "#,
        )
        .unwrap();
        let collection = collect(&units).unwrap();
        let users = AccessPattern::new("users", ["id"]).unwrap();
        assert_eq!(collection.count(&users), 2);
        let sites = collection
            .sites(&users)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(sites, ["repo::Repo::find", "repo::<Repo as Finder>::find"]);
    }

    #[test]
    fn generic_impls_are_distinct_sites() {
        let units = parse(
            "repo",
            r#"
            struct Store<T>(T);
            impl Store<Pg> {
                #[query_pattern(table = "users", columns = ["id"])]
                fn find(&self) {}
            }
            impl Store<db::Sqlite> {
                #[query_pattern(table = "users", columns = ["id"])]
                fn find(&self) {}
            }
            "#,
        )
        .unwrap();
        let collection = collect(&units).unwrap();
        let users = AccessPattern::new("users", ["id"]).unwrap();
        assert_eq!(collection.count(&users), 2);
        let sites = collection
            .sites(&users)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(sites, ["repo::Store<Pg>::find", "repo::Store<Sqlite>::find"]);
    }

    #[test]
    fn reference_self_types_keep_their_shape() {
        let units = parse(
            "repo",
            r#"
            impl<'a> Finder for &'a mut Repo<'a, T> {
                #[query_pattern(table = "users", columns = ["id"])]
                fn find(&self) {}
            }
            "#,
        )
        .unwrap();
        assert_eq!(
            patterns(&units[0])[0].0,
            "repo::<&mut Repo<'a, T> as Finder>::find"
        );
    }

    #[test]
    fn inline_modules_become_units() {
        let units = parse(
            "repo",
            r#"
            fn top() {}
            mod inner {
                #[query_pattern(table = "users", columns = ["id"])]
                fn find() {}
            }
            "#,
        )
        .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].name(), "repo::inner");
        assert_eq!(
            patterns(&units[1]),
            [("repo::inner::find".to_string(), "users('id',)".to_string())]
        );
    }

    #[test]
    fn unrelated_attributes_are_ignored() {
        let units = parse(
            "repo",
            r#"
            #[inline]
            #[allow(dead_code)]
            fn foo() {}
            "#,
        )
        .unwrap();
        assert!(patterns(&units[0]).is_empty());
    }

    #[test]
    fn empty_table_is_invalid() {
        let err = parse(
            "repo",
            r#"#[query_pattern(table = "", columns = ["a"])] fn foo() {}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(s) if s.starts_with("repo::foo")));
    }

    #[test]
    fn empty_columns_are_invalid() {
        let err = parse(
            "repo",
            r#"#[query_pattern(table = "t", columns = [])] fn foo() {}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn constant_table_is_unsupported() {
        let err = parse(
            "repo",
            r#"#[query_pattern(table = users::TABLE, columns = ["a"])] fn foo() {}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOrigin(s) if s.contains("path")));
    }

    #[test]
    fn constant_column_list_is_unsupported() {
        let err = parse(
            "repo",
            r#"#[query_pattern(table = "t", columns = COLUMNS)] fn foo() {}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOrigin(_)));
    }

    #[test]
    fn missing_columns_are_invalid() {
        let err = parse("repo", r#"#[query_pattern(table = "t")] fn foo() {}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn unknown_properties_are_invalid() {
        let err = parse(
            "repo",
            r#"#[query_pattern(table = "t", columns = ["a"], unique = true)] fn foo() {}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(s) if s.contains("unsupported property")));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = parse("broken", "fn (").unwrap_err();
        assert!(matches!(err, Error::Parse { ref path, .. } if path == "broken"));
    }
}
