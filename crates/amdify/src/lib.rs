//! CommonJS to AMD converter
//!
//! Rewrites files that load their dependencies with nested `require("...")`
//! calls into `define(name, [deps], factory)` wrappers, optionally across the
//! whole dependency closure and merged into one bundle with a small loader.

pub mod bundle;
pub mod config;
pub mod error;
pub mod extractor;
pub mod graph_walker;
pub mod naming;
pub mod orchestrator;
pub mod output;
pub mod package_json;
pub mod resolver;
pub mod types;
pub mod util;
pub mod wrapper;

pub use error::{ConvertError, Result};
pub use orchestrator::{ConversionOutput, Converter};
