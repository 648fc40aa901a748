//! Path helpers shared by the resolver and the graph walker

use std::path::{Component, Path, PathBuf};

use cow_utils::CowUtils;

/// Extension of converted source files
pub const SOURCE_EXTENSION: &str = ".js";

/// Express `path` relative to `base`, climbing with `..` where needed.
///
/// Both paths are expected to be absolute and lexically clean.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = path.components().collect();

    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// Render a path with forward slashes on every platform
pub fn to_unix_string(path: &Path) -> String {
    path.to_string_lossy().cow_replace('\\', "/").into_owned()
}

/// Module identity for a root-relative, forward-slash path.
///
/// Strips a trailing `.js` and every leading `../` segment, so files reached
/// by climbing out of the root (typically `../node_modules/...`) are named by
/// the part below the climb.
pub fn module_identity(resolved_path: &str) -> String {
    let mut name = resolved_path
        .strip_suffix(SOURCE_EXTENSION)
        .unwrap_or(resolved_path);
    while let Some(rest) = name.strip_prefix("../") {
        name = rest;
    }
    name.to_owned()
}

/// Make a path absolute against the current directory and drop `.`/`..` lexically
pub fn absolute_clean(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut clean = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                clean.pop();
            }
            other => clean.push(other.as_os_str()),
        }
    }
    Ok(clean)
}
