use stratguard_core::config::FixerConfig;

use crate::fixes::traits::FixGenerator;
use crate::fixes::types::{Fix, FixType};
use crate::issues::{Issue, IssueCategory};

/// No safe edit exists: intent cannot be inferred. Emits a suggestion only.
pub struct UndefinedVariableFixer {
    confidence: f64,
    auto_floor: f64,
}

impl UndefinedVariableFixer {
    pub fn new(config: &FixerConfig) -> Self {
        Self {
            confidence: config.undefined_variable_confidence,
            auto_floor: config.auto_floor,
        }
    }
}

impl FixGenerator for UndefinedVariableFixer {
    fn id(&self) -> &str {
        "undefined-variable"
    }

    fn can_fix(&self, issue: &Issue) -> bool {
        issue.category == IssueCategory::UndefinedVariable
    }

    fn generate(&self, issue: &Issue, lines: &[String]) -> Option<Fix> {
        let line = lines.get(issue.line_index())?;
        let explanation = issue
            .suggestion
            .clone()
            .unwrap_or_else(|| "define or import the name before it is used".to_string());
        Some(
            Fix::suggestion(issue, issue.line, line)
                .classified(FixType::ManualOnly, self.confidence, self.auto_floor)
                .explained(explanation),
        )
    }
}
