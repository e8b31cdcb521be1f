//! Orphaned else/else-if branches, and branches that continue a conditional
//! from a different method.

use stratguard_core::Severity;

use crate::issues::{Issue, IssueCategory};

use super::branch_scan::{BranchKind, BranchMatch, BranchScanner};
use super::context::DetectionContext;
use super::traits::{DetectionMode, Detector};

pub struct OrphanedBranchDetector;

impl Detector for OrphanedBranchDetector {
    fn id(&self) -> &str {
        "orphaned-branch"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::OrphanedBranch
    }

    fn mode(&self) -> DetectionMode {
        DetectionMode::Text
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Issue> {
        let window = ctx.config.branch_scan_window;
        let scanner = BranchScanner::new(ctx.lines(), window);
        let mut issues = Vec::new();

        for (idx, kind, found) in scanner.branches() {
            let issue = match found {
                BranchMatch::Orphaned => Issue::new(
                    Severity::Critical,
                    IssueCategory::OrphanedBranch,
                    (idx + 1) as u32,
                    format!(
                        "`{}` has no matching opener within {} lines",
                        kind.keyword(),
                        window
                    ),
                ),
                BranchMatch::CrossMethod { opener, boundary } => Issue::new(
                    Severity::Critical,
                    IssueCategory::MethodBoundaryConfusion,
                    (idx + 1) as u32,
                    format!(
                        "`{}` continues the conditional at line {} across the method boundary at line {}",
                        kind.keyword(),
                        opener + 1,
                        boundary + 1
                    ),
                ),
                BranchMatch::Aligned { .. } | BranchMatch::Misaligned { .. } => continue,
            };
            let mut issue = issue.with_suggestion(suggestion(kind, &ctx.lines()[idx]));
            if let Some(snippet) = ctx.snippet(idx) {
                issue = issue.with_snippet(snippet);
            }
            issues.push(issue);
        }
        issues
    }
}

fn suggestion(kind: BranchKind, line: &str) -> String {
    match kind {
        BranchKind::ElseIf => {
            let trimmed = line.trim_start();
            let rest = trimmed
                .strip_prefix("elif")
                .or_else(|| {
                    trimmed
                        .strip_prefix("else")
                        .and_then(|r| r.trim_start().strip_prefix("if"))
                })
                .unwrap_or(trimmed);
            format!("turn it into a standalone `if{}`", rest.trim_end())
        }
        BranchKind::Else => "remove the `else` or attach it to its conditional".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_rewrites_else_if() {
        assert_eq!(suggestion(BranchKind::ElseIf, "    elif x > 0:"), "turn it into a standalone `if x > 0:`");
        assert_eq!(suggestion(BranchKind::ElseIf, "else if x:"), "turn it into a standalone `if x:`");
    }
}
