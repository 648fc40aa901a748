//! Nearest `package.json` lookup
//!
//! Only the fields needed to recognise a package's main entry are read. Every
//! failure (no manifest, unreadable file, invalid JSON) yields `None`: the
//! lookup only ever feeds an optional renaming.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Deserialize)]
pub struct PackageJson {
    /// Declared package name
    pub name: Option<String>,
    /// Declared main entry, relative to the package directory
    pub main: Option<String>,
    /// Directory holding the manifest
    #[serde(skip)]
    pub dir: PathBuf,
}

impl PackageJson {
    /// Load a manifest from an explicit path
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| debug!("Cannot read {}: {e}", path.display()))
            .ok()?;
        let mut manifest: Self = serde_json::from_str(&content)
            .map_err(|e| debug!("Invalid manifest {}: {e}", path.display()))
            .ok()?;
        manifest.dir = path.parent()?.to_path_buf();
        Some(manifest)
    }

    /// Find the manifest closest to `file`, searching its directory and then
    /// every ancestor up to the filesystem root
    pub fn find_nearest(file: &Path) -> Option<Self> {
        file.ancestors()
            .skip(1)
            .map(|dir| dir.join(MANIFEST_FILE))
            .find(|candidate| candidate.is_file())
            .and_then(|path| Self::from_path(&path))
    }

    /// Absolute path of the main entry. Node falls back to `index.js` when
    /// `main` is not declared.
    pub fn main_path(&self) -> PathBuf {
        let main = self.main.as_deref().unwrap_or("index.js");
        let main = main.strip_prefix("./").unwrap_or(main);
        self.dir.join(main)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_find_nearest_walks_up() {
        let temp_dir = TempDir::new().expect("temp dir");
        let pkg_dir = temp_dir.path().join("node_modules/lib");
        fs::create_dir_all(pkg_dir.join("src/deep")).expect("create dirs");
        fs::write(
            pkg_dir.join("package.json"),
            r#"{ "name": "lib", "main": "./src/index.js", "version": "1.0.0" }"#,
        )
        .expect("write manifest");

        let manifest =
            PackageJson::find_nearest(&pkg_dir.join("src/deep/file.js")).expect("manifest");
        assert_eq!(manifest.name.as_deref(), Some("lib"));
        assert_eq!(manifest.dir, pkg_dir);
        assert_eq!(manifest.main_path(), pkg_dir.join("src/index.js"));
    }

    #[test]
    fn test_missing_main_defaults_to_index() {
        let temp_dir = TempDir::new().expect("temp dir");
        fs::write(temp_dir.path().join("package.json"), r#"{ "name": "x" }"#)
            .expect("write manifest");

        let manifest =
            PackageJson::find_nearest(&temp_dir.path().join("index.js")).expect("manifest");
        assert_eq!(manifest.main_path(), temp_dir.path().join("index.js"));
    }

    #[test]
    fn test_invalid_manifest_is_soft_failure() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("package.json");
        fs::write(&path, "{ not json").expect("write manifest");
        assert!(PackageJson::from_path(&path).is_none());
    }
}
