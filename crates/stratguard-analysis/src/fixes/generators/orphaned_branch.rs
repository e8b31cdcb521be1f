use stratguard_core::config::FixerConfig;

use crate::detectors::branch_scan::{classify, BranchKind};
use crate::fixes::traits::FixGenerator;
use crate::fixes::types::{Fix, FixType};
use crate::issues::Issue;
use crate::lines::{block_end, inline_body, is_code, leading_whitespace, statement_starts};

use super::span;

const TRIVIAL_BODIES: &[&str] = &["pass", "..."];

/// Orphaned `elif` becomes `if`; orphaned `else` is deleted when its body
/// does nothing and left for review otherwise.
pub struct OrphanedBranchFixer {
    elif_to_if: f64,
    delete_trivial_else: f64,
    nontrivial_else: f64,
    auto_floor: f64,
}

impl OrphanedBranchFixer {
    pub fn new(config: &FixerConfig) -> Self {
        Self {
            elif_to_if: config.elif_to_if_confidence,
            delete_trivial_else: config.delete_trivial_else_confidence,
            nontrivial_else: config.nontrivial_else_confidence,
            auto_floor: config.auto_floor,
        }
    }
}

impl FixGenerator for OrphanedBranchFixer {
    fn id(&self) -> &str {
        "orphaned-branch"
    }

    fn can_fix(&self, issue: &Issue) -> bool {
        issue.category.is_branch_defect()
    }

    fn generate(&self, issue: &Issue, lines: &[String]) -> Option<Fix> {
        let idx = issue.line_index();
        let header = lines.get(idx)?;
        let line = issue.line;

        match classify(header)? {
            BranchKind::ElseIf => {
                let rewritten = elif_as_if(header)?;
                Some(
                    Fix::replace(issue, line, line, &span(lines, idx, idx), &[rewritten])
                        .classified(FixType::Auto, self.elif_to_if, self.auto_floor)
                        .explained("turn the detached else-if into a standalone if"),
                )
            }
            BranchKind::Else => {
                let end = block_end(lines, idx);
                if is_trivial_else(lines, idx, end) {
                    Some(
                        Fix::delete(issue, line, end as u32 + 1, &span(lines, idx, end))
                            .classified(FixType::Auto, self.delete_trivial_else, self.auto_floor)
                            .explained("delete the detached else; its body does nothing"),
                    )
                } else {
                    Some(
                        Fix::suggestion(issue, line, header)
                            .classified(FixType::ManualOnly, self.nontrivial_else, self.auto_floor)
                            .explained(
                                "the detached else has side effects; attach it to its conditional by hand",
                            ),
                    )
                }
            }
        }
    }
}

/// `    elif x:` / `    else if x:` -> `    if x:`.
fn elif_as_if(header: &str) -> Option<String> {
    let indent = leading_whitespace(header);
    let trimmed = header.trim_start();
    let rest = match trimmed.strip_prefix("elif") {
        Some(rest) => rest,
        None => trimmed.strip_prefix("else")?.trim_start().strip_prefix("if")?,
    };
    Some(format!("{indent}if{rest}"))
}

fn is_trivial_else(lines: &[String], header_idx: usize, end: usize) -> bool {
    if let Some(inline) = inline_body(&lines[header_idx]) {
        return TRIVIAL_BODIES.contains(&inline) && end == header_idx;
    }
    let starts = statement_starts(lines);
    (header_idx + 1..=end)
        .filter(|&i| starts[i] && is_code(&lines[i]))
        .all(|i| {
            let stmt = lines[i].trim();
            TRIVIAL_BODIES.contains(&stmt) || stmt.starts_with('"') || stmt.starts_with('\'')
        })
}
