//! Strategy classes must define (or inherit in-file) the initializer and
//! the per-step hook.

use stratguard_core::Severity;

use crate::issues::{Issue, IssueCategory};

use super::context::DetectionContext;
use super::strategy::StrategyIndex;
use super::traits::{DetectionMode, Detector};

pub struct RequiredMethodDetector;

impl Detector for RequiredMethodDetector {
    fn id(&self) -> &str {
        "required-method"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::MissingRequiredMethod
    }

    fn mode(&self) -> DetectionMode {
        DetectionMode::Tree
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Issue> {
        let Some(tree) = ctx.tree() else {
            return Vec::new();
        };
        let index = StrategyIndex::build(tree, ctx.source(), ctx.config);
        let required = [ctx.config.initializer.as_str(), ctx.config.step_hook.as_str()];

        let mut issues = Vec::new();
        for class in index.strategies() {
            for method in required {
                if index.resolve_method(class, method).is_some() {
                    continue;
                }
                let row = class.node.start_position().row;
                let mut issue = Issue::new(
                    Severity::High,
                    IssueCategory::MissingRequiredMethod,
                    class.line(),
                    format!("strategy class `{}` is missing required method `{}`", class.name, method),
                )
                .with_suggestion(format!("define `def {}(self):` in `{}`", method, class.name));
                if let Some(snippet) = ctx.snippet(row) {
                    issue = issue.with_snippet(snippet);
                }
                issues.push(issue);
            }
        }
        issues
    }
}
