//! Lexical discovery of `require("...")` calls
//!
//! Discovery is pattern matching over raw text, not parsing. A `require(`
//! followed by a single- or double-quoted literal without escaped quotes counts
//! as a dependency wherever it appears, including comments and strings.
//!
//! Everything downstream only depends on [`DependencyExtractor`], so a
//! tokenizer-aware scanner can replace [`RegexExtractor`] without touching the
//! resolver, the allocator or the rewriter.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::FxIndexSet;

static REQUIRE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"require\(['"]([^'"]+)['"]\)"#).expect("require() pattern is a valid regex")
});

/// One textual `require("...")` occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireCall {
    /// Byte range of the whole call, `require(` through `)`
    pub range: Range<usize>,
    /// The literal specifier between the quotes
    pub specifier: String,
}

pub trait DependencyExtractor {
    /// Every require call in source order, duplicates included
    fn require_calls(&self, source: &str) -> Vec<RequireCall>;

    /// Distinct specifiers in first-occurrence order
    fn extract(&self, source: &str) -> Vec<String> {
        self.require_calls(source)
            .into_iter()
            .map(|call| call.specifier)
            .collect::<FxIndexSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Regex-based scanner for `require('x')` / `require("x")`
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexExtractor;

impl DependencyExtractor for RegexExtractor {
    fn require_calls(&self, source: &str) -> Vec<RequireCall> {
        REQUIRE_CALL
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let specifier = caps.get(1)?;
                Some(RequireCall {
                    range: whole.range(),
                    specifier: specifier.as_str().to_owned(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_requires() {
        assert!(RegexExtractor.extract("var x = 1;\nmodule.exports = x;").is_empty());
    }

    #[test]
    fn test_first_occurrence_order_and_dedup() {
        let source = r#"
var b = require("./b");
var a = require('./a');
var b2 = require("./b");
"#;
        assert_eq!(RegexExtractor.extract(source), vec!["./b", "./a"]);
    }

    #[test]
    fn test_call_ranges_cover_whole_call() {
        let source = "x(require('lib'));";
        let calls = RegexExtractor.require_calls(source);
        assert_eq!(calls.len(), 1);
        assert_eq!(&source[calls[0].range.clone()], "require('lib')");
        assert_eq!(calls[0].specifier, "lib");
    }

    #[test]
    fn test_matches_inside_comments() {
        // Lexical matching: commented-out requires still count
        let source = "// require('./old')\nvar n = require(\"./new\");";
        assert_eq!(RegexExtractor.extract(source), vec!["./old", "./new"]);
    }

    #[test]
    fn test_ignores_computed_and_spaced_calls() {
        let source = "require(name); require( './spaced' ); require(`./tpl`);";
        assert!(RegexExtractor.extract(source).is_empty());
    }

    #[test]
    fn test_mixed_quotes_are_not_a_match() {
        // `[^'"]+` stops at the first quote of either kind
        let source = r#"require("it's")"#;
        assert!(RegexExtractor.extract(source).is_empty());
    }
}
