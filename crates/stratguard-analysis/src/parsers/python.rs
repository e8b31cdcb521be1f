//! tree-sitter Python grammar and syntax-error extraction.

use tree_sitter::{Node, Parser, Tree};

use stratguard_core::errors::ParseError;

use super::source_unit::SyntaxDiagnostic;

const SNIPPET_MAX_CHARS: usize = 40;

/// The tree-sitter Python grammar.
pub fn language() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Parse Python source into a tree. tree-sitter is error tolerant, so a
/// returned tree may still contain `ERROR` / `MISSING` nodes.
pub fn parse_tree(source: &[u8], name: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .map_err(|e| ParseError::GrammarLoad {
            language: "python".to_string(),
            message: e.to_string(),
        })?;
    parser.parse(source, None).ok_or_else(|| ParseError::NoTree {
        name: name.to_string(),
    })
}

/// First `ERROR` or `MISSING` node in document order, as a diagnostic.
pub fn first_syntax_error(tree: &Tree, source: &[u8]) -> Option<SyntaxDiagnostic> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }
    let node = find_first_error(root).unwrap_or(root);
    let pos = node.start_position();
    Some(SyntaxDiagnostic {
        line: pos.row as u32 + 1,
        column: pos.column as u32 + 1,
        message: describe(node, source),
    })
}

fn find_first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(found) = find_first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

fn describe(node: Node, source: &[u8]) -> String {
    if node.is_missing() {
        return format!("missing `{}`", node.kind());
    }
    let text = node.utf8_text(source).unwrap_or("");
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if first_line.is_empty() {
        return "invalid syntax".to_string();
    }
    let snippet: String = first_line.chars().take(SNIPPET_MAX_CHARS).collect();
    format!("invalid syntax near `{snippet}`")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_source_has_no_error() {
        let src = b"def f(x):\n    return x\n";
        let tree = parse_tree(src, "t.py").unwrap();
        assert!(first_syntax_error(&tree, src).is_none());
    }

    #[test]
    fn test_empty_source_is_valid() {
        let tree = parse_tree(b"", "t.py").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
        assert!(first_syntax_error(&tree, b"").is_none());
    }

    #[test]
    fn test_unclosed_paren_reports_position() {
        let src = b"x = 1\ny = foo(1, 2\n";
        let tree = parse_tree(src, "t.py").unwrap();
        let diag = first_syntax_error(&tree, src).expect("syntax error");
        assert!(diag.line >= 1);
        assert!(!diag.message.is_empty());
    }
}
