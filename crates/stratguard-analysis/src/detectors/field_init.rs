//! The strategy initializer must set the pending-order field.

use stratguard_core::Severity;
use tree_sitter::Node;

use crate::issues::{Issue, IssueCategory};

use super::context::DetectionContext;
use super::strategy::StrategyIndex;
use super::syntax::{assigns_self_attribute, calls_super_method, row};
use super::traits::{DetectionMode, Detector};

pub struct FieldInitDetector;

// The assignment search stops at nested definitions, so start at the body.
fn initializes(def: Node, source: &[u8], field: &str) -> bool {
    def.child_by_field_name("body")
        .is_some_and(|body| assigns_self_attribute(body, source, field))
}

impl Detector for FieldInitDetector {
    fn id(&self) -> &str {
        "field-init"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::MissingFieldInit
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
            // Inherited initializers are checked on the class that owns them.
            let Some(init) = class.own_method(&config.initializer) else {
                continue;
            };
            if initializes(init, source, field) {
                continue;
            }
            let inherited = init
                .child_by_field_name("body")
                .is_some_and(|body| calls_super_method(body, source, &config.initializer))
                && index.ancestors(class).into_iter().any(|ancestor| {
                    ancestor
                        .own_method(&config.initializer)
                        .is_some_and(|a| initializes(a, source, field))
                });
            if inherited {
                continue;
            }

            let statement = config.pending_field_init();
            tracing::debug!(class = %class.name, field, "initializer never sets pending-order field");
            let mut issue = Issue::new(
                Severity::Medium,
                IssueCategory::MissingFieldInit,
                row(init) as u32 + 1,
                format!(
                    "`{}` of `{}` never initializes `self.{}`",
                    config.initializer, class.name, field
                ),
            )
            .with_suggestion(format!("add `{}` to `{}`", statement, config.initializer));
            if let Some(snippet) = ctx.snippet(row(init)) {
                issue = issue.with_snippet(snippet);
            }
            issues.push(issue);
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::SourceUnit;
    use stratguard_core::config::ValidatorConfig;

    fn detect(src: &str) -> Vec<Issue> {
        let unit = SourceUnit::parse("s.py", src).unwrap();
        let config = ValidatorConfig::default();
        FieldInitDetector.detect(&DetectionContext::new(&unit, &config))
    }

    #[test]
    fn test_initialized_field_is_accepted() {
        let src = "\
import backtrader as bt

class S(bt.Strategy):
    def __init__(self):
        self.order = None
        self.buyprice = None

    def next(self):
        pass
";
        assert!(detect(src).is_empty());
    }

    #[test]
    fn test_ancestor_initializer_satisfies_child() {
        let src = "\
import backtrader as bt

class Base(bt.Strategy):
    def __init__(self):
        self.order = None

class Child(Base):
    def __init__(self):
        super().__init__()
        self.sma = None
";
        assert!(detect(src).is_empty());
    }

    #[test]
    fn test_child_without_super_call_is_flagged() {
        let src = "\
import backtrader as bt

class Base(bt.Strategy):
    def __init__(self):
        self.order = None

class Child(Base):
    def __init__(self):
        self.sma = None
";
        let issues = detect(src);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 8);
        assert!(issues[0].message.contains("`Child`"));
    }
}
