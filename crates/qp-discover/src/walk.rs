use super::parse;
use ignore::WalkBuilder;
use qp_core::{EXCLUDE_DIRS, Error, PATH_SEPARATOR, SOURCE_EXTENSION};
use qp_registry::CodeUnit;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Walks `root` and loads every Rust source below it exactly once.
///
/// Directories in [`EXCLUDE_DIRS`] are never entered, ignore files are
/// honored, and files whose name starts with `_` are skipped. Symlinks are
/// followed, but a file reachable through several paths loads once under
/// the first path in walk order. Sources that fail to read or parse are
/// skipped with a warning; a malformed declaration in a parsed source
/// fails the walk.
pub fn discover(root: &Path) -> Result<Vec<CodeUnit>, Error> {
    let root = canonical(root)?;
    let walker = WalkBuilder::new(&root)
        .standard_filters(true)
        .follow_links(true)
        .sort_by_file_path(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            let dir = entry.file_type().is_some_and(|t| t.is_dir());
            let name = entry.file_name().to_string_lossy();
            !(dir && EXCLUDE_DIRS.contains(&name.as_ref()))
        })
        .build();

    let mut seen = HashSet::new();
    let mut units = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) || !is_source(entry.path()) {
            continue;
        }
        let Ok(real) = entry.path().canonicalize() else {
            log::warn!("skipping unresolvable path {}", entry.path().display());
            continue;
        };
        if !seen.insert(real) {
            log::trace!("already loaded {}", entry.path().display());
            continue;
        }
        let name = module_name(&root, entry.path());
        let text = match std::fs::read_to_string(entry.path()) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        match parse(&name, &text) {
            Ok(parsed) => units.extend(parsed),
            Err(e @ Error::Parse { .. }) => log::warn!("skipping {}", e),
            Err(e) => return Err(e),
        }
    }
    log::debug!("discovered {} units under {}", units.len(), root.display());
    match units.is_empty() {
        true => Err(Error::NoUnitsFound(root.display().to_string())),
        false => Ok(units),
    }
}

/// Loads the named modules below `root`, each at most once.
///
/// A module is given as `app::repo`, `app/repo`, `app.repo` or
/// `app/repo.rs`, and resolves to `app/repo.rs` or `app/repo/mod.rs`.
/// Unlike [`discover`], every failure is reported: a missing module is
/// [`Error::Io`] and an unparseable one is [`Error::Parse`].
pub fn load(root: &Path, modules: &[String]) -> Result<Vec<CodeUnit>, Error> {
    let root = canonical(root)?;
    let mut seen = HashSet::new();
    let mut units = Vec::new();
    for module in modules.iter() {
        let path = locate(&root, module)?;
        let real = canonical(&path)?;
        if !seen.insert(real) {
            log::trace!("module {} already loaded", module);
            continue;
        }
        let text = std::fs::read_to_string(&path).map_err(|e| Error::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        units.extend(parse(&module_name(&root, &path), &text)?);
    }
    match units.is_empty() {
        true => Err(Error::NoUnitsFound(root.display().to_string())),
        false => Ok(units),
    }
}

fn canonical(path: &Path) -> Result<PathBuf, Error> {
    path.canonicalize().map_err(|e| Error::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn is_source(path: &Path) -> bool {
    let extension = path.extension().is_some_and(|e| e == SOURCE_EXTENSION);
    let private = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'));
    extension && !private
}

/// Resolves a module name to the file defining it.
fn locate(root: &Path, module: &str) -> Result<PathBuf, Error> {
    let trimmed = module.trim();
    let trimmed = trimmed.strip_suffix(".rs").unwrap_or(trimmed);
    let segments = trimmed
        .split(PATH_SEPARATOR)
        .flat_map(|s| s.split(['/', '.']))
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>();
    if segments.is_empty() {
        return Err(Error::InvalidArgument(format!("empty module name {:?}", module)));
    }
    let base = segments.iter().fold(root.to_path_buf(), |p, s| p.join(s));
    [base.with_extension(SOURCE_EXTENSION), base.join("mod").with_extension(SOURCE_EXTENSION)]
        .into_iter()
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| Error::Io {
            path: module.to_string(),
            message: format!("no module source below {}", root.display()),
        })
}

/// Unit name of a source file: its path relative to `root`, without the
/// extension, joined with `::`. A trailing `mod` names its directory.
fn module_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    let mut segments = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<String>>();
    if segments.len() > 1 && segments.last().is_some_and(|s| s == "mod") {
        segments.pop();
    }
    segments.join(PATH_SEPARATOR)
}
