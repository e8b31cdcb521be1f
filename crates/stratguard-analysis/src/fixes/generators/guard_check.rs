use stratguard_core::config::{FixerConfig, ValidatorConfig};

use crate::fixes::traits::FixGenerator;
use crate::fixes::types::{Fix, FixType};
use crate::issues::{Issue, IssueCategory};

use super::body_insert_point;

/// Inserts `if self.<field>: return` at the top of the step hook.
pub struct GuardCheckFixer {
    confidence: f64,
    auto_floor: f64,
    field: String,
}

impl GuardCheckFixer {
    pub fn new(fixer: &FixerConfig, validator: &ValidatorConfig) -> Self {
        Self {
            confidence: fixer.guard_insert_confidence,
            auto_floor: fixer.auto_floor,
            field: validator.pending_order_field.clone(),
        }
    }
}

impl FixGenerator for GuardCheckFixer {
    fn id(&self) -> &str {
        "guard-check"
    }

    fn can_fix(&self, issue: &Issue) -> bool {
        issue.category == IssueCategory::MissingGuardCheck
    }

    fn generate(&self, issue: &Issue, lines: &[String]) -> Option<Fix> {
        let point = body_insert_point(lines, issue.line_index())?;
        let guard = vec![
            format!("{}if self.{}:", point.indent, self.field),
            format!("{}{}return", point.indent, point.unit),
        ];
        Some(
            Fix::insert(issue, point.index as u32 + 1, &guard)
                .classified(FixType::SemiAuto, self.confidence, self.auto_floor)
                .explained("skip the bar while an order is outstanding"),
        )
    }
}
