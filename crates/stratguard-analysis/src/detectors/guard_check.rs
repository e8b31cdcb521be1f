//! The step hook should open with a guard on the pending-order field.

use stratguard_core::Severity;
use tree_sitter::Node;

use crate::issues::{Issue, IssueCategory};

use super::context::DetectionContext;
use super::strategy::StrategyIndex;
use super::syntax::{body_statements, mentions_self_attribute, row};
use super::traits::{DetectionMode, Detector};

const CONTROL_FLOW: &[&str] = &[
    "if_statement",
    "while_statement",
    "for_statement",
    "try_statement",
    "with_statement",
    "match_statement",
];

pub struct GuardCheckDetector;

impl Detector for GuardCheckDetector {
    fn id(&self) -> &str {
        "guard-check"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::MissingGuardCheck
    }

    fn mode(&self) -> DetectionMode {
        DetectionMode::Tree
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Issue> {
        let Some(tree) = ctx.tree() else {
            return Vec::new();
        };
        let source = ctx.source();
        let config = ctx.config;
        let field = config.pending_order_field.as_str();
        let index = StrategyIndex::build(tree, source, config);

        let mut issues = Vec::new();
        for class in index.strategies() {
            let Some(hook) = class.own_method(&config.step_hook) else {
                continue;
            };
            if is_guarded(hook, source, field) {
                continue;
            }
            let mut issue = Issue::new(
                Severity::Low,
                IssueCategory::MissingGuardCheck,
                row(hook) as u32 + 1,
                format!(
                    "`{}` of `{}` does not check `self.{}` before trading",
                    config.step_hook, class.name, field
                ),
            )
            .with_suggestion(format!(
                "start `{}` with `if self.{}: return`",
                config.step_hook, field
            ));
            if let Some(snippet) = ctx.snippet(row(hook)) {
                issue = issue.with_snippet(snippet);
            }
            issues.push(issue);
        }
        issues
    }
}

/// The first control-flow statement is an `if`/`while` whose condition
/// mentions `self.<field>`.
fn is_guarded(hook: Node, source: &[u8], field: &str) -> bool {
    let first = body_statements(hook)
        .into_iter()
        .find(|stmt| CONTROL_FLOW.contains(&stmt.kind()));
    match first {
        Some(stmt) if matches!(stmt.kind(), "if_statement" | "while_statement") => stmt
            .child_by_field_name("condition")
            .is_some_and(|cond| mentions_self_attribute(cond, source, field)),
        _ => false,
    }
}
