//! Module resolution
//!
//! Maps a `require()` specifier to a file and gives that file its module
//! identity. The specifier lookup itself follows Node's CommonJS rules and is
//! delegated to `oxc_resolver`; this module only turns the resulting absolute
//! path into root-relative names.

use std::path::{Path, PathBuf};

use log::debug;
use oxc_resolver::{ResolveOptions, Resolver};

use crate::{
    error::{ConvertError, Result},
    package_json::PackageJson,
    types::ResolvedModule,
    util::{SOURCE_EXTENSION, module_identity, relative_path, to_unix_string},
};

pub struct ModuleResolver {
    /// Absolute root that resolved paths are expressed against
    root: PathBuf,
    resolver: Resolver,
    /// Replace package main-entry identities with the package name
    short_names: bool,
}

impl std::fmt::Debug for ModuleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleResolver")
            .field("root", &self.root)
            .field("short_names", &self.short_names)
            .finish_non_exhaustive()
    }
}

impl ModuleResolver {
    /// Create a resolver for an absolute root.
    ///
    /// `extensions` are tried in order for specifiers without one, e.g. `[".js", ".json"]`.
    pub fn new(root: PathBuf, extensions: &[String], short_names: bool) -> Self {
        let resolver = Resolver::new(ResolveOptions {
            condition_names: vec!["require".into(), "node".into(), "default".into()],
            extensions: extensions.to_vec(),
            // Keep paths as the user sees them so they stay relative to the root
            symlinks: false,
            ..Default::default()
        });

        Self {
            root,
            resolver,
            short_names,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `specifier` as written in the file at `from` (absolute path)
    pub fn resolve(&self, specifier: &str, from: &Path) -> Result<ResolvedModule> {
        let directory = from.parent().unwrap_or(&self.root);
        let resolution = self.resolver.resolve(directory, specifier).map_err(|e| {
            debug!("Resolver error for '{specifier}' from {}: {e}", from.display());
            ConvertError::Resolution {
                specifier: specifier.to_owned(),
                from: from.to_path_buf(),
            }
        })?;

        let module = self.module_for_path(resolution.path());
        debug!(
            "Resolved '{specifier}' from {} -> {} ({})",
            from.display(),
            module.resolved_path,
            module.require_name
        );
        Ok(module)
    }

    /// Module identity of a file given by absolute path
    pub fn module_for_path(&self, absolute_path: &Path) -> ResolvedModule {
        let resolved_path = to_unix_string(&relative_path(&self.root, absolute_path));
        let mut require_name = module_identity(&resolved_path);

        if self.short_names {
            if let Some(package_name) = package_entry_name(absolute_path, &require_name) {
                debug!("Shortening module name {require_name} -> {package_name}");
                require_name = package_name;
            }
        }

        ResolvedModule {
            absolute_path: absolute_path.to_path_buf(),
            resolved_path,
            require_name,
        }
    }
}

/// Package name when `file` is the main entry of its nearest package.
///
/// Matches either on the file itself being the manifest's main entry, or on
/// the identity spelling out `<name>/<main>` (with or without `.js`), which is
/// the shape identities take when the root is a `node_modules` directory.
fn package_entry_name(file: &Path, require_name: &str) -> Option<String> {
    let Some(manifest) = PackageJson::find_nearest(file) else {
        debug!("No package.json above {}", file.display());
        return None;
    };
    let name = manifest.name.as_deref()?;

    let main_path = manifest.main_path();
    let main_with_extension = PathBuf::from(format!("{}{SOURCE_EXTENSION}", main_path.display()));
    if file == main_path || file == main_with_extension {
        return Some(name.to_owned());
    }

    let main = manifest.main.as_deref().unwrap_or("index.js");
    let main = main.strip_prefix("./").unwrap_or(main);
    let lib = format!("{name}/{main}");
    if lib == require_name || lib == format!("{require_name}{SOURCE_EXTENSION}") {
        return Some(name.to_owned());
    }

    debug!(
        "{} is not the main entry of package {name}",
        file.display()
    );
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn create_test_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write test file");
    }

    fn default_extensions() -> Vec<String> {
        vec![".js".to_owned(), ".json".to_owned()]
    }

    #[test]
    fn test_relative_resolution() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        create_test_file(&root.join("app.js"), "");
        create_test_file(&root.join("lib/foo-bar.js"), "");

        let resolver = ModuleResolver::new(root.to_path_buf(), &default_extensions(), false);
        let module = resolver
            .resolve("./lib/foo-bar", &root.join("app.js"))
            .expect("resolves");

        assert_eq!(module.resolved_path, "lib/foo-bar.js");
        assert_eq!(module.require_name, "lib/foo-bar");
        assert_eq!(module.absolute_path, root.join("lib/foo-bar.js"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        create_test_file(&root.join("src/app.js"), "");
        create_test_file(&root.join("src/util/index.js"), "");

        let resolver = ModuleResolver::new(root.to_path_buf(), &default_extensions(), false);
        let from = root.join("src/app.js");
        let first = resolver.resolve("./util", &from).expect("resolves");
        let second = resolver.resolve("./util", &from).expect("resolves");

        assert_eq!(first, second);
        assert_eq!(first.require_name, "src/util/index");
    }

    #[test]
    fn test_bare_specifier_outside_root_strips_climb() {
        let temp_dir = TempDir::new().expect("temp dir");
        let project = temp_dir.path();
        create_test_file(&project.join("src/app.js"), "");
        create_test_file(
            &project.join("node_modules/lib/package.json"),
            r#"{ "name": "lib", "main": "main.js" }"#,
        );
        create_test_file(&project.join("node_modules/lib/main.js"), "");

        let resolver =
            ModuleResolver::new(project.join("src"), &default_extensions(), false);
        let module = resolver
            .resolve("lib", &project.join("src/app.js"))
            .expect("resolves");

        assert_eq!(module.resolved_path, "../node_modules/lib/main.js");
        assert_eq!(module.require_name, "node_modules/lib/main");
    }

    #[test]
    fn test_short_names_use_package_name_for_main_entry() {
        let temp_dir = TempDir::new().expect("temp dir");
        let project = temp_dir.path();
        create_test_file(&project.join("app.js"), "");
        create_test_file(
            &project.join("node_modules/lib/package.json"),
            r#"{ "name": "lib", "main": "./main.js" }"#,
        );
        create_test_file(&project.join("node_modules/lib/main.js"), "");
        create_test_file(&project.join("node_modules/lib/other.js"), "");

        let resolver = ModuleResolver::new(project.to_path_buf(), &default_extensions(), true);
        let from = project.join("app.js");

        let main = resolver.resolve("lib", &from).expect("resolves");
        assert_eq!(main.require_name, "lib");
        assert_eq!(main.resolved_path, "node_modules/lib/main.js");

        let other = resolver.resolve("lib/other", &from).expect("resolves");
        assert_eq!(other.require_name, "node_modules/lib/other");
    }

    #[test]
    fn test_short_names_without_manifest_is_soft() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        create_test_file(&root.join("app.js"), "");
        create_test_file(&root.join("a.js"), "");

        let resolver = ModuleResolver::new(root.to_path_buf(), &default_extensions(), true);
        let module = resolver.resolve("./a", &root.join("app.js")).expect("resolves");
        assert_eq!(module.require_name, "a");
    }

    #[test]
    fn test_missing_module_is_resolution_error() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        create_test_file(&root.join("app.js"), "");

        let resolver = ModuleResolver::new(root.to_path_buf(), &default_extensions(), false);
        let err = resolver
            .resolve("./nope", &root.join("app.js"))
            .expect_err("must fail");

        match err {
            ConvertError::Resolution { specifier, from } => {
                assert_eq!(specifier, "./nope");
                assert_eq!(from, root.join("app.js"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
