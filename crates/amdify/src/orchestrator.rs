//! Conversion entry points
//!
//! [`Converter`] owns the resolver for one run and exposes the three things a
//! caller can ask for: the dependency list of the input, a single converted
//! module, or the converted closure (as a table or as one bundle).

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    bundle::{BundleOptions, create_bundle},
    config::ConvertSettings,
    error::{ConvertError, IoAction, Result},
    extractor::{DependencyExtractor, RegexExtractor},
    graph_walker::{GraphWalker, read_source},
    resolver::ModuleResolver,
    types::{ConversionTable, Dependency},
    util::absolute_clean,
    wrapper::WrapperOptions,
};

/// Result of [`Converter::convert`]
#[derive(Debug, Clone)]
pub enum ConversionOutput {
    /// Non-recursive conversion of the input file
    Module(String),
    /// Recursive conversion, keyed by module identity
    Modules {
        entry: String,
        table: ConversionTable,
    },
    /// Recursive conversion merged into one text
    Bundle { entry: String, code: String },
}

pub struct Converter {
    input: PathBuf,
    resolver: ModuleResolver,
    extractor: Box<dyn DependencyExtractor>,
    entry_wrapper: WrapperOptions,
    recursive: bool,
    bundle: Option<BundleOptions>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("input", &self.input)
            .field("resolver", &self.resolver)
            .field("entry_wrapper", &self.entry_wrapper)
            .field("recursive", &self.recursive)
            .field("bundle", &self.bundle)
            .finish_non_exhaustive()
    }
}

impl Converter {
    pub fn new(settings: &ConvertSettings) -> Result<Self> {
        let input = absolute(&settings.input)?;
        let root = absolute(&settings.root)?;
        debug!("Input {}, root {}", input.display(), root.display());

        let resolver = ModuleResolver::new(root, &settings.extensions, settings.short_names);
        let bundle = settings.bundle.then_some(BundleOptions {
            require_shim: settings.require_shim,
            define_self: settings.define_self,
        });

        Ok(Self {
            input,
            resolver,
            extractor: Box::new(RegexExtractor),
            entry_wrapper: settings.entry_wrapper.clone(),
            recursive: settings.recursive,
            bundle,
        })
    }

    /// Replace the lexical `require()` scanner
    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn DependencyExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Module identity of the input file
    pub fn entry_identity(&self) -> String {
        self.resolver.module_for_path(&self.input).require_name
    }

    fn walker(&self) -> GraphWalker<'_> {
        GraphWalker::new(
            &self.resolver,
            self.extractor.as_ref(),
            &self.entry_wrapper.global_object,
        )
    }

    /// Direct dependencies of the input, in discovery order
    pub fn dependencies(&self) -> Result<Vec<Dependency>> {
        let source = read_source(&self.input)?;
        self.walker().dependencies(&source, &self.input)
    }

    /// Read the input and convert it
    pub fn convert(&self) -> Result<ConversionOutput> {
        let source = read_source(&self.input)?;
        self.convert_source(&source)
    }

    /// Convert `source` as if it were the content of the input file
    pub fn convert_source(&self, source: &str) -> Result<ConversionOutput> {
        let walker = self.walker();

        if !self.recursive {
            let converted = walker.convert_source(source, &self.input, &self.entry_wrapper)?;
            return Ok(ConversionOutput::Module(converted.code));
        }

        let mut table = ConversionTable::default();
        let entry = walker.walk_source(source, &self.input, &self.entry_wrapper, &mut table)?;
        info!("Converted {} modules from {entry}", table.len());

        Ok(match self.bundle {
            Some(options) => ConversionOutput::Bundle {
                code: create_bundle(&table, &entry, options),
                entry,
            },
            None => ConversionOutput::Modules { entry, table },
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    absolute_clean(path).map_err(|e| ConvertError::io(IoAction::Read, path, e))
}
