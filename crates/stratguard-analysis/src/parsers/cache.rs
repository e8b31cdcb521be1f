//! Parse cache: Moka in-memory, keyed strictly by content hash.
//!
//! Optional performance layer. A miss and a hit produce the same unit.

use moka::sync::Cache;
use tree_sitter::Tree;

use super::source_unit::SyntaxDiagnostic;

/// Parser output for one text, independent of the unit's name.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub tree: Option<Tree>,
    pub parse_error: Option<SyntaxDiagnostic>,
}

/// In-memory parse cache using Moka (TinyLFU admission).
pub struct ParseCache {
    inner: Cache<u64, ParsedSource>,
}

impl ParseCache {
    /// Create a new parse cache with the given capacity.
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get(&self, content_hash: u64) -> Option<ParsedSource> {
        self.inner.get(&content_hash)
    }

    pub fn insert(&self, content_hash: u64, parsed: ParsedSource) {
        self.inner.insert(content_hash, parsed);
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(1_024)
    }
}
