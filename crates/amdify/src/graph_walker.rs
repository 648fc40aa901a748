//! Per-file conversion and recursive traversal of the dependency closure
//!
//! A file is converted by running the extractor, resolving every distinct
//! specifier, allocating local names and emitting the wrapper. The recursive
//! walk threads one [`ConversionTable`] through every step: a module is added
//! to the table before its dependencies are visited, and a dependency whose
//! identity is already present is skipped. That single membership test is what
//! terminates cycles and keeps diamonds from being converted twice.

use std::path::Path;

use log::{debug, trace};

use crate::{
    error::{ConvertError, IoAction, Result},
    extractor::DependencyExtractor,
    naming::IdentifierAllocator,
    resolver::ModuleResolver,
    types::{ConversionTable, Dependency},
    util::module_identity,
    wrapper::{WrapperOptions, emit_module, rewrite_body},
};

/// One wrapped module
#[derive(Debug, Clone)]
pub struct ConvertedModule {
    /// Module identity, the table key
    pub identity: String,
    pub dependencies: Vec<Dependency>,
    /// The wrapped source text
    pub code: String,
}

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ConvertError::io(IoAction::Read, path, e))
}

#[derive(Clone, Copy)]
pub struct GraphWalker<'a> {
    resolver: &'a ModuleResolver,
    extractor: &'a dyn DependencyExtractor,
    global_object: &'a str,
}

impl std::fmt::Debug for GraphWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphWalker")
            .field("resolver", self.resolver)
            .field("global_object", &self.global_object)
            .finish_non_exhaustive()
    }
}

impl<'a> GraphWalker<'a> {
    pub fn new(
        resolver: &'a ModuleResolver,
        extractor: &'a dyn DependencyExtractor,
        global_object: &'a str,
    ) -> Self {
        Self {
            resolver,
            extractor,
            global_object,
        }
    }

    /// Resolve and name every distinct dependency of `source`, in discovery order
    pub fn dependencies(&self, source: &str, input: &Path) -> Result<Vec<Dependency>> {
        let mut allocator = IdentifierAllocator::new(source);
        self.extractor
            .extract(source)
            .into_iter()
            .map(|specifier| {
                let module = self.resolver.resolve(&specifier, input)?;
                let file_identity = module_identity(&module.resolved_path);
                let js_name = allocator.allocate_for(&file_identity, &module.require_name);
                Ok(Dependency::new(specifier, module, js_name))
            })
            .collect()
    }

    /// Convert already loaded text of the file at `input`
    pub fn convert_source(
        &self,
        source: &str,
        input: &Path,
        options: &WrapperOptions,
    ) -> Result<ConvertedModule> {
        let identity = self.resolver.module_for_path(input).require_name;
        let dependencies = self.dependencies(source, input)?;

        let calls = self.extractor.require_calls(source);
        let body = rewrite_body(source, &calls, &dependencies);
        let code = emit_module(&identity, &dependencies, &body, options);

        debug!(
            "Converted {identity} with {} dependencies",
            dependencies.len()
        );
        Ok(ConvertedModule {
            identity,
            dependencies,
            code,
        })
    }

    /// Read and convert the file at `input`
    pub fn convert_file(&self, input: &Path, options: &WrapperOptions) -> Result<ConvertedModule> {
        let source = read_source(input)?;
        self.convert_source(&source, input, options)
    }

    /// Convert `input` and its whole dependency closure into `table`.
    ///
    /// `options` apply to `input` only; every other module is emitted as a
    /// plain `define` under its own identity. Returns the identity of `input`.
    pub fn walk(
        &self,
        input: &Path,
        options: &WrapperOptions,
        table: &mut ConversionTable,
    ) -> Result<String> {
        let source = read_source(input)?;
        self.walk_source(&source, input, options, table)
    }

    /// [`Self::walk`] for an entry whose text is already loaded
    pub fn walk_source(
        &self,
        source: &str,
        input: &Path,
        options: &WrapperOptions,
        table: &mut ConversionTable,
    ) -> Result<String> {
        let converted = self.convert_source(source, input, options)?;
        let identity = converted.identity;
        table.entry(identity.clone()).or_insert(converted.code);

        let dependency_options = WrapperOptions::dependency(self.global_object);
        for dependency in &converted.dependencies {
            if table.contains_key(&dependency.require_name) {
                trace!(
                    "Skipping {} from {identity}: already converted",
                    dependency.require_name
                );
                continue;
            }
            self.walk(&dependency.absolute_path, &dependency_options, table)?;
        }

        Ok(identity)
    }
}
