//! Configuration and option validation
//!
//! Settings come from, lowest precedence first: built-in defaults, the user
//! config file (`<config dir>/amdify/amdify.toml`), `amdify.toml` in the
//! current directory, an explicit `--config` file, and finally command-line
//! flags. Option validation happens before any source file is read.

use std::path::{Path, PathBuf};

use etcetera::{BaseStrategy, choose_base_strategy};
use log::{debug, warn};
use serde::Deserialize;

use crate::{
    error::{ConvertError, Result},
    output::OutputTarget,
    wrapper::{DEFAULT_GLOBAL_OBJECT, WrapperOptions, WrapperStyle},
};

pub const CONFIG_FILE_NAME: &str = "amdify.toml";

/// Settings that can be stored in a config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root that module identities are relative to; defaults to the current directory
    pub root: Option<PathBuf>,
    /// Object receiving `--global` exports
    pub global_object: String,
    /// Extensions tried when a specifier has none
    pub extensions: Vec<String>,
    /// Name package main entries by their package name
    pub short_names: bool,
    /// Prepend the runtime loader to bundles
    pub require_shim: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            global_object: DEFAULT_GLOBAL_OBJECT.to_owned(),
            extensions: vec![".js".to_owned(), ".json".to_owned()],
            short_names: false,
            require_shim: true,
        }
    }
}

/// One config file layer; unset keys leave lower layers untouched
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
struct ConfigFile {
    root: Option<PathBuf>,
    global_object: Option<String>,
    extensions: Option<Vec<String>>,
    short_names: Option<bool>,
    require_shim: Option<bool>,
}

impl ConfigFile {
    fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::configuration(format!(
                "Can't read config file \"{}\". {e}",
                path.display()
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            ConvertError::configuration(format!(
                "Invalid config file \"{}\": {}",
                path.display(),
                e.message()
            ))
        })
    }
}

impl Config {
    /// Load every config layer, `explicit` last. An explicit file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let implicit = [user_config_path(), Some(PathBuf::from(CONFIG_FILE_NAME))];
        for path in implicit.iter().flatten() {
            if path.is_file() {
                debug!("Loading config from {}", path.display());
                config.merge(ConfigFile::from_path(path)?);
            }
        }

        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            config.merge(ConfigFile::from_path(path)?);
        }

        Ok(config)
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(root) = file.root {
            self.root = Some(root);
        }
        if let Some(global_object) = file.global_object {
            self.global_object = global_object;
        }
        if let Some(extensions) = file.extensions {
            self.extensions = extensions;
        }
        if let Some(short_names) = file.short_names {
            self.short_names = short_names;
        }
        if let Some(require_shim) = file.require_shim {
            self.require_shim = require_shim;
        }
    }
}

/// `<platform config dir>/amdify/amdify.toml`
pub fn user_config_path() -> Option<PathBuf> {
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("amdify").join(CONFIG_FILE_NAME))
}

/// Everything one invocation asked for, before validation
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub input: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub stdout: bool,
    pub name: Option<String>,
    pub require: bool,
    pub recursive: bool,
    pub bundle: bool,
    pub global: bool,
    pub dependencies: bool,
    pub short_names: bool,
    pub no_require_shim: bool,
    pub no_define_self: bool,
}

/// What a validated invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print `specifier -> resolved path` for the input's direct dependencies
    ListDependencies,
    /// Convert and write to the given target
    Convert(OutputTarget),
}

/// Validated, fully defaulted settings for one run
#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub input: PathBuf,
    pub root: PathBuf,
    pub mode: Mode,
    /// Wrapper for the input module; dependencies always get a plain `define`
    pub entry_wrapper: WrapperOptions,
    pub recursive: bool,
    pub bundle: bool,
    pub require_shim: bool,
    pub define_self: bool,
    pub short_names: bool,
    pub extensions: Vec<String>,
}

impl ConvertOptions {
    /// Every option that another option overrides, as `(ignored, by)` pairs
    pub fn ignored_options(&self) -> Vec<(&'static str, &'static str)> {
        let mut ignored = Vec::new();

        if self.dependencies {
            let by = "--dependencies";
            if self.output.is_some() {
                ignored.push(("--output", by));
            }
            if self.bundle {
                ignored.push(("--bundle", by));
            }
            if self.stdout {
                ignored.push(("--stdout", by));
            }
            if self.name.is_some() {
                ignored.push(("--name", by));
            }
            if self.require {
                ignored.push(("--require", by));
            }
            if self.recursive {
                ignored.push(("--recursive", by));
            }
        } else if self.bundle {
            let by = "--bundle";
            if self.name.is_some() && !self.global {
                ignored.push(("--name", by));
            }
            if self.require {
                ignored.push(("--require", by));
            }
            if self.recursive {
                ignored.push(("--recursive", by));
            }
        } else if self.recursive {
            if self.stdout {
                ignored.push(("--stdout", "--recursive"));
            }
        } else if self.require && self.name.is_some() && !self.global {
            ignored.push(("--name", "--require"));
        }

        if self.output.is_some() && self.stdout && !self.dependencies {
            ignored.push(("--stdout", "--output"));
        }
        ignored
    }

    /// Log every option that another option overrides
    pub fn warn_ignored(&self) {
        for (option, by) in self.ignored_options() {
            warn!("{option} option is ignored with {by}");
        }
    }

    /// Check required options and apply defaults.
    ///
    /// `cwd` is the fallback root; `config` supplies file-based defaults that
    /// flags override.
    pub fn validate(self, config: &Config, cwd: &Path) -> Result<ConvertSettings> {
        let input = self.input.ok_or_else(|| {
            ConvertError::configuration("No input file (first argument, or -i/--input)")
        })?;

        if self.global && self.name.is_none() {
            return Err(ConvertError::configuration(
                "--name (-n) is required with --global (-g)",
            ));
        }

        let root = self
            .root
            .or_else(|| config.root.clone())
            .unwrap_or_else(|| cwd.to_path_buf());

        let recursive = self.recursive || self.bundle;
        let mode = if self.dependencies {
            Mode::ListDependencies
        } else if recursive && !self.bundle {
            let dir = self.output.ok_or_else(|| {
                ConvertError::configuration("No output dir (-o/--output)")
            })?;
            Mode::Convert(OutputTarget::Directory(dir))
        } else {
            match (self.output, self.stdout) {
                (Some(path), _) => Mode::Convert(OutputTarget::File(path)),
                (None, true) => Mode::Convert(OutputTarget::Stdout),
                (None, false) => {
                    return Err(ConvertError::configuration(
                        "No output file path (-o/--output)",
                    ));
                }
            }
        };

        let style = if self.require || self.bundle {
            WrapperStyle::Require
        } else {
            WrapperStyle::Define
        };

        Ok(ConvertSettings {
            input,
            root,
            mode,
            entry_wrapper: WrapperOptions {
                style,
                name: self.name,
                global_export: self.global,
                global_object: config.global_object.clone(),
            },
            recursive,
            bundle: self.bundle,
            require_shim: config.require_shim && !self.no_require_shim,
            define_self: !self.no_define_self,
            short_names: self.short_names || config.short_names,
            extensions: config.extensions.clone(),
        })
    }
}
