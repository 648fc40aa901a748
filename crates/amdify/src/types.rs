//! Shared type definitions for the amdify crate
//!
//! This module contains the records that flow between the extractor, resolver,
//! allocator, rewriter and graph walker.

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

/// Type alias for FxHasher-based IndexMap
pub type FxIndexMap<K, V> = IndexMap<K, V, std::hash::BuildHasherDefault<FxHasher>>;

/// Type alias for FxHasher-based IndexSet
pub type FxIndexSet<T> = IndexSet<T, std::hash::BuildHasherDefault<FxHasher>>;

/// Converted modules keyed by module identity, in conversion order
pub type ConversionTable = FxIndexMap<String, String>;

/// A dependency specifier resolved to a concrete file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Absolute path of the target file
    pub absolute_path: PathBuf,
    /// Target file path relative to the root, forward-slash separated
    pub resolved_path: String,
    /// Module identity used in the declaration list and as the table key
    pub require_name: String,
}

/// One distinct `require("...")` reference of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Specifier exactly as written in the source
    pub original_path: String,
    /// Target file path relative to the root, forward-slash separated
    pub resolved_path: String,
    /// Module identity of the target
    pub require_name: String,
    /// Local identifier substituted at each call site
    pub js_name: String,
    /// Absolute path of the target, used to recurse into it
    pub absolute_path: PathBuf,
}

impl Dependency {
    pub fn new(original_path: String, module: ResolvedModule, js_name: String) -> Self {
        Self {
            original_path,
            resolved_path: module.resolved_path,
            require_name: module.require_name,
            js_name,
            absolute_path: module.absolute_path,
        }
    }
}
