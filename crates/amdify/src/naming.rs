//! Local identifier allocation for dependencies
//!
//! Each dependency of a file gets the shortest readable name that is free in
//! that file. "Free" is a text-level approximation of scope analysis: a
//! candidate is rejected if another dependency of the same file already holds
//! it, or if it occurs anywhere in the original source as a substring.

use log::debug;
use rustc_hash::FxHashSet;

/// Suffix of the preferred, basename-derived identifier
const MODULE_SUFFIX: &str = "Module";

/// First counter value tried for numbered identifiers
const FIRST_COUNTER: usize = 2;

/// lowerCamelCase form of a module path.
///
/// Splits on runs of non-alphanumeric characters. The first token is kept as
/// written; every following token gets its first character upper-cased.
pub fn path_to_lower_camel_case(path: &str) -> String {
    let mut tokens = path.split(|c: char| !c.is_ascii_alphanumeric());
    let mut name = tokens.next().unwrap_or_default().to_owned();
    for token in tokens {
        let mut chars = token.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Base name of a `/`-separated module identity
fn basename(require_name: &str) -> &str {
    require_name.rsplit('/').next().unwrap_or(require_name)
}

/// Keep generated names valid identifiers
fn sanitize(name: String) -> String {
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Assigns collision-free identifiers within one file
#[derive(Debug)]
pub struct IdentifierAllocator<'a> {
    source: &'a str,
    assigned: FxHashSet<String>,
}

impl<'a> IdentifierAllocator<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            assigned: FxHashSet::default(),
        }
    }

    fn is_free(&self, candidate: &str) -> bool {
        !self.assigned.contains(candidate) && !self.source.contains(candidate)
    }

    fn claim(&mut self, name: String) -> String {
        self.assigned.insert(name.clone());
        name
    }

    /// Allocate an identifier for a module whose identity is both its file
    /// path and its declared name.
    pub fn allocate(&mut self, require_name: &str) -> String {
        self.allocate_for(require_name, require_name)
    }

    /// Allocate an identifier for a resolved module.
    ///
    /// Tries `<basename>Module`, then the camel-cased `require_name`, then
    /// `require_name` with a counter starting at 2. The basename is taken from
    /// `file_identity`, the path-derived identity before any package-name
    /// shortening, so shortening never changes the preferred local name.
    pub fn allocate_for(&mut self, file_identity: &str, require_name: &str) -> String {
        let short = sanitize(format!(
            "{}{MODULE_SUFFIX}",
            path_to_lower_camel_case(basename(file_identity))
        ));
        if self.is_free(&short) {
            debug!("Identifier for {require_name}: {short}");
            return self.claim(short);
        }

        let full = sanitize(path_to_lower_camel_case(require_name));
        if self.is_free(&full) {
            debug!("Identifier for {require_name}: {full} ({short} taken)");
            return self.claim(full);
        }

        let mut count = FIRST_COUNTER;
        loop {
            let numbered = format!("{full}{count}");
            if self.is_free(&numbered) {
                debug!("Identifier for {require_name}: {numbered} ({short} and {full} taken)");
                return self.claim(numbered);
            }
            count += 1;
        }
    }
}
