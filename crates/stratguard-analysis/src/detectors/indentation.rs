//! Branches matched to an opener at a different indentation.

use stratguard_core::Severity;

use crate::issues::{Issue, IssueCategory};

use super::branch_scan::{BranchMatch, BranchScanner};
use super::context::DetectionContext;
use super::traits::{DetectionMode, Detector};
use crate::lines::indent_width;

pub struct IndentationMismatchDetector;

impl Detector for IndentationMismatchDetector {
    fn id(&self) -> &str {
        "indentation-mismatch"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::IndentationMismatch
    }

    fn mode(&self) -> DetectionMode {
        DetectionMode::Text
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Issue> {
        let lines = ctx.lines();
        let scanner = BranchScanner::new(lines, ctx.config.branch_scan_window);

        scanner
            .branches()
            .filter_map(|(idx, kind, found)| {
                let BranchMatch::Misaligned { opener, opener_indent } = found else {
                    return None;
                };
                let mut issue = Issue::new(
                    Severity::High,
                    IssueCategory::IndentationMismatch,
                    (idx + 1) as u32,
                    format!(
                        "`{}` is indented {} columns but its opener at line {} is at {}",
                        kind.keyword(),
                        indent_width(&lines[idx]),
                        opener + 1,
                        opener_indent
                    ),
                )
                .with_suggestion(format!("align `{}` with line {}", kind.keyword(), opener + 1));
                if let Some(snippet) = ctx.snippet(idx) {
                    issue = issue.with_snippet(snippet);
                }
                Some(issue)
            })
            .collect()
    }
}
