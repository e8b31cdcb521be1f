use stratguard_core::config::{FixerConfig, ValidatorConfig};

use crate::fixes::traits::FixGenerator;
use crate::fixes::types::{Fix, FixType};
use crate::issues::{Issue, IssueCategory};
use crate::lines::block_end;

use super::body_insert_point;

/// Inserts the canonical initialization statements at the top of the
/// initializer body.
pub struct FieldInitFixer {
    confidence: f64,
    auto_floor: f64,
    statements: Vec<String>,
}

impl FieldInitFixer {
    pub fn new(fixer: &FixerConfig, validator: &ValidatorConfig) -> Self {
        Self {
            confidence: fixer.field_init_confidence,
            auto_floor: fixer.auto_floor,
            statements: fixer.expanded_field_init(&validator.pending_order_field),
        }
    }
}

impl FixGenerator for FieldInitFixer {
    fn id(&self) -> &str {
        "field-init"
    }

    fn can_fix(&self, issue: &Issue) -> bool {
        issue.category == IssueCategory::MissingFieldInit
    }

    fn generate(&self, issue: &Issue, lines: &[String]) -> Option<Fix> {
        let def_idx = issue.line_index();
        let point = body_insert_point(lines, def_idx)?;

        let end = block_end(lines, def_idx);
        let existing: Vec<&str> = lines[def_idx..=end].iter().map(|l| l.trim()).collect();
        let new_lines: Vec<String> = self
            .statements
            .iter()
            .filter(|stmt| !existing.contains(&stmt.as_str()))
            .map(|stmt| format!("{}{}", point.indent, stmt))
            .collect();
        if new_lines.is_empty() {
            return None;
        }

        Some(
            Fix::insert(issue, point.index as u32 + 1, &new_lines)
                .classified(FixType::Auto, self.confidence, self.auto_floor)
                .explained("initialize the pending-order state before the first bar"),
        )
    }
}
