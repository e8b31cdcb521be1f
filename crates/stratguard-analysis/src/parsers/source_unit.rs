//! SourceUnit: one candidate strategy file, parsed once and never mutated.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tree_sitter::Tree;

use super::hasher::hash_content;
use super::manager::SourceParser;
use stratguard_core::errors::ParseError;

/// Position and message of the first syntax error in a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxDiagnostic {
    /// 1-indexed line.
    pub line: u32,
    /// 1-indexed column.
    pub column: u32,
    pub message: String,
}

/// Parsed representation of one source text.
///
/// A fix never edits a unit in place: the patched text is parsed into a new
/// unit. Clones share the text and line buffers.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    name: Arc<str>,
    text: Arc<str>,
    lines: Arc<[String]>,
    trailing_newline: bool,
    tree: Option<Tree>,
    parse_error: Option<SyntaxDiagnostic>,
    content_hash: u64,
}

impl SourceUnit {
    /// Parse `text` with a throwaway, uncached parser.
    pub fn parse(name: &str, text: &str) -> Result<Self, ParseError> {
        SourceParser::without_cache().parse(name, text)
    }

    pub(crate) fn from_parts(
        name: &str,
        text: &str,
        tree: Option<Tree>,
        parse_error: Option<SyntaxDiagnostic>,
    ) -> Self {
        let (lines, trailing_newline) = split_lines(text);
        Self {
            name: Arc::from(name),
            text: Arc::from(text),
            lines: Arc::from(lines),
            trailing_newline,
            // A unit with a syntax error never exposes a partial tree.
            tree: if parse_error.is_some() { None } else { tree },
            parse_error,
            content_hash: hash_content(text.as_bytes()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// All lines, without terminators. Index 0 is line 1.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// A single 1-indexed line.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn parse_error(&self) -> Option<&SyntaxDiagnostic> {
        self.parse_error.as_ref()
    }

    /// True when the text parsed without errors.
    pub fn is_valid(&self) -> bool {
        self.parse_error.is_none()
    }

    pub fn content_hash(&self) -> u64 {
        self.content_hash
    }

    /// Reassemble text from (possibly edited) lines using this unit's
    /// trailing-newline convention.
    pub fn render(&self, lines: &[String]) -> String {
        join_lines(lines, self.trailing_newline)
    }
}

/// Split text into lines, remembering whether it ended with a newline.
pub fn split_lines(text: &str) -> (Vec<String>, bool) {
    let lines = text.lines().map(str::to_string).collect();
    (lines, text.ends_with('\n'))
}

/// Inverse of [`split_lines`].
pub fn join_lines(lines: &[String], trailing_newline: bool) -> String {
    let mut out = lines.join("\n");
    if trailing_newline && !lines.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_join_preserves_trailing_newline() {
        let text = "a = 1\nb = 2\n";
        let (lines, trailing) = split_lines(text);
        assert_eq!(lines, vec!["a = 1", "b = 2"]);
        assert!(trailing);
        assert_eq!(join_lines(&lines, trailing), text);
    }

    #[test]
    fn test_split_join_without_trailing_newline() {
        let text = "a = 1\nb = 2";
        let (lines, trailing) = split_lines(text);
        assert!(!trailing);
        assert_eq!(join_lines(&lines, trailing), text);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        let (lines, trailing) = split_lines("");
        assert!(lines.is_empty());
        assert!(!trailing);
        assert_eq!(join_lines(&lines, trailing), "");
    }

    #[test]
    fn test_line_is_one_indexed() {
        let unit = SourceUnit::from_parts("t.py", "x = 1\ny = 2\n", None, None);
        assert_eq!(unit.line(1), Some("x = 1"));
        assert_eq!(unit.line(2), Some("y = 2"));
        assert_eq!(unit.line(0), None);
        assert_eq!(unit.line(3), None);
    }
}
