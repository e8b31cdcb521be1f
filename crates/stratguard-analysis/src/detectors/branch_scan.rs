//! Backward scan that pairs else/else-if lines with their opening conditional.
//!
//! Text-level on purpose: a branch nested inside the wrong method can still
//! parse, and the tree no longer records where it came from.

use std::sync::LazyLock;

use regex::Regex;

use crate::lines::{indent_width, is_code, statement_starts};

static ELSE_IF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(elif\b|else\s+if\b)").expect("valid regex"));
static ELSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^else\s*:").expect("valid regex"));
static IF_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(if|elif)\b").expect("valid regex"));
static ELSE_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(if|elif|for|while|except|async\s+for)\b|^try\s*:").expect("valid regex")
});
static DEF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(async\s+)?def\b").expect("valid regex"));

/// Continuation-branch flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    /// `elif cond:` or `else if cond:`.
    ElseIf,
    /// `else:`.
    Else,
}

impl BranchKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::ElseIf => "elif",
            Self::Else => "else",
        }
    }

    fn accepts(&self, trimmed: &str) -> bool {
        match self {
            Self::ElseIf => IF_OPENER.is_match(trimmed),
            Self::Else => ELSE_HOST.is_match(trimmed),
        }
    }
}

/// Outcome of the backward scan. Line values are 0-based indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchMatch {
    /// Opener found at the same indentation.
    Aligned { opener: usize },
    /// Opener found at a shallower indentation.
    Misaligned { opener: usize, opener_indent: usize },
    /// Aligned opener found only after crossing a `def` header.
    CrossMethod { opener: usize, boundary: usize },
    /// No opener within the window.
    Orphaned,
}

/// Classify a line as a continuation branch.
pub fn classify(line: &str) -> Option<BranchKind> {
    let trimmed = line.trim_start();
    if ELSE_IF.is_match(trimmed) {
        Some(BranchKind::ElseIf)
    } else if ELSE.is_match(trimmed) {
        Some(BranchKind::Else)
    } else {
        None
    }
}

pub fn is_def_header(line: &str) -> bool {
    DEF_HEADER.is_match(line.trim_start())
}

/// Backward scanner over one unit's lines. Only statement-start lines take
/// part, so continuation lines and docstring text never look like branches.
pub struct BranchScanner<'a> {
    lines: &'a [String],
    starts: Vec<bool>,
    window: usize,
}

impl<'a> BranchScanner<'a> {
    /// `window` bounds how many code lines the backward scan may look at.
    pub fn new(lines: &'a [String], window: usize) -> Self {
        Self {
            lines,
            starts: statement_starts(lines),
            window,
        }
    }

    fn is_statement(&self, idx: usize) -> bool {
        self.starts.get(idx).copied().unwrap_or(false) && is_code(&self.lines[idx])
    }

    /// Every branch line with its scan outcome, in line order.
    pub fn branches(&self) -> impl Iterator<Item = (usize, BranchKind, BranchMatch)> + '_ {
        (0..self.lines.len()).filter_map(|idx| {
            self.match_at(idx).map(|(kind, found)| (idx, kind, found))
        })
    }

    /// Scan backward from the branch at `idx`. Returns `None` when `idx` is
    /// not a branch line.
    pub fn match_at(&self, idx: usize) -> Option<(BranchKind, BranchMatch)> {
        if !self.is_statement(idx) {
            return None;
        }
        let kind = classify(&self.lines[idx])?;
        let branch_indent = indent_width(&self.lines[idx]);

        let mut budget = self.window;
        let mut boundary: Option<usize> = None;

        for j in (0..idx).rev() {
            if budget == 0 {
                break;
            }
            if !self.is_statement(j) {
                continue;
            }
            budget -= 1;

            let line = &self.lines[j];
            let indent = indent_width(line);
            if indent > branch_indent {
                continue;
            }
            let trimmed = line.trim_start();

            if kind.accepts(trimmed) {
                let found = match (indent == branch_indent, boundary) {
                    (true, None) => BranchMatch::Aligned { opener: j },
                    (true, Some(boundary)) => BranchMatch::CrossMethod { opener: j, boundary },
                    (false, None) => BranchMatch::Misaligned {
                        opener: j,
                        opener_indent: indent,
                    },
                    (false, Some(_)) => BranchMatch::Orphaned,
                };
                return Some((kind, found));
            }

            // A sibling statement at the branch's level ends any chain it
            // could have continued.
            if indent == branch_indent {
                return Some((kind, BranchMatch::Orphaned));
            }

            if boundary.is_none() && DEF_HEADER.is_match(trimmed) {
                boundary = Some(j);
                continue;
            }
            return Some((kind, BranchMatch::Orphaned));
        }

        Some((kind, BranchMatch::Orphaned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    fn match_branch(lines: &[String], idx: usize, window: usize) -> Option<(BranchKind, BranchMatch)> {
        BranchScanner::new(lines, window).match_at(idx)
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("    elif x > 0:"), Some(BranchKind::ElseIf));
        assert_eq!(classify("else if x:"), Some(BranchKind::ElseIf));
        assert_eq!(classify("  else:"), Some(BranchKind::Else));
        assert_eq!(classify("else :"), Some(BranchKind::Else));
        assert_eq!(classify("elsewhere = 1"), None);
        assert_eq!(classify("x = a if b else c"), None);
    }

    #[test]
    fn test_aligned_if_elif_else_chain() {
        let src = lines("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3");
        assert_eq!(match_branch(&src, 2, 50), Some((BranchKind::ElseIf, BranchMatch::Aligned { opener: 0 })));
        assert_eq!(match_branch(&src, 4, 50), Some((BranchKind::Else, BranchMatch::Aligned { opener: 2 })));
    }

    #[test]
    fn test_sibling_statement_orphans_branch() {
        let src = lines("def init(self):\n    self.x = 1\n    elif self.x > 0:\n        pass");
        assert_eq!(match_branch(&src, 2, 50), Some((BranchKind::ElseIf, BranchMatch::Orphaned)));
    }

    #[test]
    fn test_else_accepts_loop_and_try_hosts() {
        let src = lines("for i in x:\n    pass\nelse:\n    pass\ntry:\n    a()\nexcept E:\n    b()\nelse:\n    c()");
        assert!(matches!(match_branch(&src, 2, 50), Some((_, BranchMatch::Aligned { opener: 0 }))));
        assert!(matches!(match_branch(&src, 8, 50), Some((_, BranchMatch::Aligned { opener: 6 }))));
    }

    #[test]
    fn test_elif_does_not_accept_loop() {
        let src = lines("for i in x:\n    pass\nelif y:\n    pass");
        assert_eq!(match_branch(&src, 2, 50), Some((BranchKind::ElseIf, BranchMatch::Orphaned)));
    }

    #[test]
    fn test_misaligned_else() {
        let src = lines("if x:\n        a = 1\n    else:\n        b = 2");
        assert_eq!(
            match_branch(&src, 2, 50),
            Some((BranchKind::Else, BranchMatch::Misaligned { opener: 0, opener_indent: 0 }))
        );
    }

    #[test]
    fn test_cross_method_branch() {
        let src = lines(
            "class S:\n    def next(self):\n        if self.x:\n            buy()\n    def notify_order(self, order):\n        elif order.status:\n            pass",
        );
        assert_eq!(
            match_branch(&src, 5, 50),
            Some((BranchKind::ElseIf, BranchMatch::CrossMethod { opener: 2, boundary: 4 }))
        );
    }

    #[test]
    fn test_window_exhaustion_orphans() {
        let mut src = vec!["if a:".to_string()];
        for _ in 0..10 {
            src.push("    x = 1".to_string());
        }
        src.push("else:".to_string());
        let last = src.len() - 1;
        assert_eq!(match_branch(&src, last, 5), Some((BranchKind::Else, BranchMatch::Orphaned)));
        assert!(matches!(match_branch(&src, last, 50), Some((_, BranchMatch::Aligned { .. }))));
    }

    #[test]
    fn test_non_branch_line() {
        let src = lines("x = 1");
        assert_eq!(match_branch(&src, 0, 50), None);
    }

    #[test]
    fn test_branch_text_inside_docstring_is_ignored() {
        let src = lines("def f():\n    \"\"\"\n    else: nothing\n    \"\"\"\n    return 1");
        assert_eq!(BranchScanner::new(&src, 50).branches().count(), 0);
    }

    #[test]
    fn test_multiline_condition_does_not_orphan_else() {
        let src = lines("if (a and\n        b\n):\n    x = 1\nelse:\n    x = 2");
        let found: Vec<_> = BranchScanner::new(&src, 50).branches().collect();
        assert_eq!(found, vec![(4, BranchKind::Else, BranchMatch::Aligned { opener: 0 })]);
    }
}
