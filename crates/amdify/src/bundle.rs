//! Bundle assembly
//!
//! A bundle is the runtime loader followed by every converted module, with
//! the entry module last. Registration order is therefore dependencies first;
//! initialization order is decided at load time by the loader.

use crate::types::ConversionTable;

/// Minimal `define`/`require` loader for environments without an AMD loader.
///
/// `define` records a module without running it. `require` initializes each
/// named dependency once (its own dependencies first), memoizes the result and
/// calls the factory. The name `"exports"` always yields a fresh object. The
/// registry lives in the shim's closure, so each loaded bundle gets its own.
pub const REQUIRE_SHIM: &str = include_str!("runtime/require-shim.js");

#[derive(Debug, Clone, Copy)]
pub struct BundleOptions {
    /// Prepend [`REQUIRE_SHIM`]
    pub require_shim: bool,
    /// Include the entry module's own text. Off when composing several bundles
    /// that share one entry page.
    pub define_self: bool,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            require_shim: true,
            define_self: true,
        }
    }
}

/// Concatenate `table` into a bundle with `entry` last
pub fn create_bundle(table: &ConversionTable, entry: &str, options: BundleOptions) -> String {
    let capacity = REQUIRE_SHIM.len() + table.values().map(|code| code.len() + 1).sum::<usize>();
    let mut bundle = String::with_capacity(capacity);

    if options.require_shim {
        bundle.push_str(REQUIRE_SHIM);
        bundle.push('\n');
    }

    for (identity, code) in table {
        if identity != entry {
            bundle.push_str(code);
            bundle.push('\n');
        }
    }

    if options.define_self {
        if let Some(code) = table.get(entry) {
            bundle.push_str(code);
        }
    }

    bundle
}
