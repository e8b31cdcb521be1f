//! Undefined-variable detection over a best-effort scope model.

pub mod names;
pub mod scope;

use stratguard_core::{FxHashSet, Severity};

use crate::issues::{Issue, IssueCategory};

use super::context::DetectionContext;
use super::traits::{DetectionMode, Detector};

pub use names::is_always_defined;
pub use scope::{NameRead, ScopeKind, ScopeWalker};

pub struct VariableReferenceDetector;

impl Detector for VariableReferenceDetector {
    fn id(&self) -> &str {
        "variable-reference"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::UndefinedVariable
    }

    fn mode(&self) -> DetectionMode {
        DetectionMode::Tree
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Issue> {
        let Some(tree) = ctx.tree() else {
            return Vec::new();
        };
        let walker = ScopeWalker::new(ctx.source()).walk(tree.root_node());
        if walker.has_wildcard_import() {
            tracing::debug!(unit = ctx.unit.name(), "wildcard import, skipping name resolution");
            return Vec::new();
        }

        let extra: FxHashSet<&str> = ctx.config.allowed_names.iter().map(String::as_str).collect();
        let mut seen: FxHashSet<(&str, usize)> = FxHashSet::default();
        let mut issues = Vec::new();

        for read in walker.reads() {
            let name = read.name.as_str();
            if name.starts_with('_')
                || is_always_defined(name)
                || extra.contains(name)
                || walker.resolves(name, read.scope)
            {
                continue;
            }
            if !seen.insert((name, read.row)) {
                continue;
            }
            let mut issue = Issue::new(
                Severity::Medium,
                IssueCategory::UndefinedVariable,
                read.row as u32 + 1,
                format!("`{}` is not defined in this scope", name),
            )
            .with_suggestion(format!("define or import `{}` before it is used", name));
            if let Some(snippet) = ctx.snippet(read.row) {
                issue = issue.with_snippet(snippet);
            }
            issues.push(issue);
        }
        issues
    }
}
