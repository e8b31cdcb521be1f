//! SourceParser: builds SourceUnits, consulting the parse cache when enabled.

use stratguard_core::errors::ParseError;
use stratguard_core::StratguardErrorCode;

use super::cache::{ParseCache, ParsedSource};
use super::hasher::hash_content;
use super::python;
use super::source_unit::{SourceUnit, SyntaxDiagnostic};

/// Parses source text into [`SourceUnit`]s.
pub struct SourceParser {
    cache: Option<ParseCache>,
}

impl SourceParser {
    /// Create a parser with the default cache capacity.
    pub fn new() -> Self {
        Self {
            cache: Some(ParseCache::default()),
        }
    }

    /// Create a parser with a specific cache capacity; 0 disables caching.
    pub fn with_cache_capacity(capacity: u64) -> Self {
        Self {
            cache: (capacity > 0).then(|| ParseCache::new(capacity)),
        }
    }

    /// Create a parser that always re-parses.
    pub fn without_cache() -> Self {
        Self { cache: None }
    }

    /// Parse `text` into a new unit named `name`.
    ///
    /// Malformed source is not an error here: the unit carries a
    /// [`super::SyntaxDiagnostic`] and no tree.
    pub fn parse(&self, name: &str, text: &str) -> Result<SourceUnit, ParseError> {
        let source = text.as_bytes();
        let content_hash = hash_content(source);

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(content_hash)) {
            tracing::trace!(unit = name, "parse cache hit");
            return Ok(SourceUnit::from_parts(name, text, cached.tree, cached.parse_error));
        }

        let tree = python::parse_tree(source, name)?;
        let parse_error = python::first_syntax_error(&tree, source);
        if let Some(diag) = &parse_error {
            tracing::debug!(unit = name, line = diag.line, message = %diag.message, "syntax error");
        }

        let parsed = ParsedSource {
            tree: Some(tree),
            parse_error,
        };
        if let Some(cache) = &self.cache {
            cache.insert(content_hash, parsed.clone());
        }
        Ok(SourceUnit::from_parts(name, text, parsed.tree, parsed.parse_error))
    }

    /// Like [`Self::parse`], but an infrastructure failure becomes the unit's
    /// syntax diagnostic so callers only ever see data.
    pub fn parse_unit(&self, name: &str, text: &str) -> SourceUnit {
        match self.parse(name, text) {
            Ok(unit) => unit,
            Err(e) => {
                tracing::warn!(unit = name, error_code = e.error_code(), error = %e, "parser failure");
                let diag = SyntaxDiagnostic {
                    line: 1,
                    column: 1,
                    message: format!("parser unavailable: {e}"),
                };
                SourceUnit::from_parts(name, text, None, Some(diag))
            }
        }
    }
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new()
    }
}
