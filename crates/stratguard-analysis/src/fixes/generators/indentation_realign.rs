use stratguard_core::config::{FixerConfig, ValidatorConfig};

use crate::detectors::branch_scan::{BranchMatch, BranchScanner};
use crate::fixes::traits::FixGenerator;
use crate::fixes::types::{Fix, FixType};
use crate::issues::{Issue, IssueCategory};
use crate::lines::leading_whitespace;

use super::span;

/// Re-indents a misaligned branch header to its opener's indentation.
pub struct IndentationRealignFixer {
    confidence: f64,
    auto_floor: f64,
    window: usize,
}

impl IndentationRealignFixer {
    pub fn new(fixer: &FixerConfig, validator: &ValidatorConfig) -> Self {
        Self {
            confidence: fixer.indentation_realign_confidence,
            auto_floor: fixer.auto_floor,
            window: validator.branch_scan_window,
        }
    }
}

impl FixGenerator for IndentationRealignFixer {
    fn id(&self) -> &str {
        "indentation-realign"
    }

    fn can_fix(&self, issue: &Issue) -> bool {
        issue.category == IssueCategory::IndentationMismatch
    }

    fn generate(&self, issue: &Issue, lines: &[String]) -> Option<Fix> {
        let idx = issue.line_index();
        let scanner = BranchScanner::new(lines, self.window);
        let (_, BranchMatch::Misaligned { opener, .. }) = scanner.match_at(idx)? else {
            return None;
        };
        let realigned = format!("{}{}", leading_whitespace(&lines[opener]), lines[idx].trim_start());
        Some(
            Fix::replace(issue, issue.line, issue.line, &span(lines, idx, idx), &[realigned])
                .classified(FixType::SemiAuto, self.confidence, self.auto_floor)
                .explained(format!("align the branch with its opener at line {}", opener + 1)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratguard_core::Severity;

    #[test]
    fn test_realigns_to_opener() {
        let src: Vec<String> = "if x:\n        a = 1\n    else:\n        b = 2"
            .lines()
            .map(str::to_string)
            .collect();
        let issue = Issue::new(Severity::High, IssueCategory::IndentationMismatch, 3, "m");
        let fixer = IndentationRealignFixer::new(&FixerConfig::default(), &ValidatorConfig::default());
        let fix = fixer.generate(&issue, &src).unwrap();
        assert_eq!(fix.replacement, "else:");
        assert_eq!(fix.fix_type, FixType::SemiAuto);
    }
}
