//! Call-site rewriting and AMD wrapper emission
//!
//! The body is never re-printed: every `require("x")` call found by the
//! extractor is replaced by the dependency's local identifier and all other
//! bytes are copied through unchanged.

use std::fmt::Write;

use rustc_hash::FxHashMap;

use crate::{extractor::RequireCall, types::Dependency};

/// Default global object for `--global` exports
pub const DEFAULT_GLOBAL_OBJECT: &str = "window";

/// Shape of the emitted registration call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapperStyle {
    /// `define("name", [deps], factory)`: registers the module
    #[default]
    Define,
    /// `require([deps], factory)`: runs the factory once its dependencies load
    Require,
}

/// Wrapper settings for one module
#[derive(Debug, Clone)]
pub struct WrapperOptions {
    pub style: WrapperStyle,
    /// Explicit module name, replacing the module identity
    pub name: Option<String>,
    /// Assign `module.exports` to `<global_object>[name]`, needs `name`
    pub global_export: bool,
    pub global_object: String,
}

impl Default for WrapperOptions {
    fn default() -> Self {
        Self {
            style: WrapperStyle::Define,
            name: None,
            global_export: false,
            global_object: DEFAULT_GLOBAL_OBJECT.to_owned(),
        }
    }
}

impl WrapperOptions {
    /// Plain `define` under the module's own identity, as used for every
    /// non-entry module of a recursive conversion
    pub fn dependency(global_object: &str) -> Self {
        Self {
            global_object: global_object.to_owned(),
            ..Self::default()
        }
    }
}

/// Replace each require call whose specifier is a known dependency with the
/// dependency's `js_name`
pub fn rewrite_body(source: &str, calls: &[RequireCall], dependencies: &[Dependency]) -> String {
    let names: FxHashMap<&str, &str> = dependencies
        .iter()
        .map(|dep| (dep.original_path.as_str(), dep.js_name.as_str()))
        .collect();

    let mut body = String::with_capacity(source.len());
    let mut last = 0;
    for call in calls {
        let Some(js_name) = names.get(call.specifier.as_str()) else {
            continue;
        };
        body.push_str(&source[last..call.range.start]);
        body.push_str(js_name);
        last = call.range.end;
    }
    body.push_str(&source[last..]);
    body
}

/// JavaScript string literal for a module name
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Wrap an already rewritten body.
///
/// `identity` names the module for `define` unless `options.name` overrides it.
pub fn emit_module(
    identity: &str,
    dependencies: &[Dependency],
    body: &str,
    options: &WrapperOptions,
) -> String {
    let declared = dependencies
        .iter()
        .map(|dep| quote(&dep.require_name))
        .collect::<Vec<_>>()
        .join(", ");
    let params = dependencies
        .iter()
        .map(|dep| dep.js_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::with_capacity(body.len() + 128);
    match options.style {
        WrapperStyle::Define => {
            let name = options.name.as_deref().unwrap_or(identity);
            let _ = write!(out, "define({}, ", quote(name));
        }
        WrapperStyle::Require => out.push_str("require("),
    }
    let _ = writeln!(out, "[{declared}], function ({params}) {{");
    out.push_str("var module = { exports: {} };\n\n");
    out.push_str(body);
    out.push('\n');
    if options.global_export {
        if let Some(name) = &options.name {
            let _ = writeln!(
                out,
                "{}[{}] = module.exports;",
                options.global_object,
                quote(name)
            );
        }
    }
    out.push_str("return module.exports;\n");
    out.push_str("});");
    out
}
