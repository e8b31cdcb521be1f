//! Write-once per-unit and batch records.

use serde::{Deserialize, Serialize};

use crate::fixes::{Fix, FixConflict, FixGenerationFailure};
use crate::issues::ValidationReport;
use crate::runner::{FailureKind, RunOutcome};

/// What the Fix stage did for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixStatus {
    /// Nothing to fix.
    Skipped,
    /// At least one fix was applied.
    Applied,
    /// Fixes were generated but none applied.
    Proposed,
    /// The unit never reached the Fix stage (parse failure).
    NotFixable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixSummary {
    pub status: FixStatus,
    pub generated: usize,
    pub applied: usize,
    pub remaining_issues: usize,
    pub conflicts: Vec<FixConflict>,
    pub failures: Vec<FixGenerationFailure>,
    /// Issues before minus issues after re-validation.
    pub delta: i64,
    pub fixes: Vec<Fix>,
}

impl FixSummary {
    pub fn not_fixable(remaining_issues: usize) -> Self {
        Self::empty(FixStatus::NotFixable, remaining_issues)
    }

    fn empty(status: FixStatus, remaining_issues: usize) -> Self {
        Self {
            status,
            generated: 0,
            applied: 0,
            remaining_issues,
            conflicts: Vec::new(),
            failures: Vec::new(),
            delta: 0,
            fixes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub metrics: serde_json::Value,
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn from_outcome(outcome: RunOutcome, duration_ms: u64) -> Self {
        match outcome {
            RunOutcome::Success { metrics } => Self {
                success: true,
                kind: None,
                message: None,
                metrics,
                duration_ms,
            },
            RunOutcome::Failure { kind, message } => Self {
                success: false,
                kind: Some(kind),
                message: Some(message),
                metrics: serde_json::Value::Null,
                duration_ms,
            },
        }
    }
}

/// Everything the pipeline learned about one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub name: String,
    pub syntax_valid: bool,
    /// Parsed only after text-level repair.
    pub recovered: bool,
    pub validation: ValidationReport,
    pub fix_summary: FixSummary,
    /// Report after re-validation; equals `validation` when nothing changed.
    pub remaining: ValidationReport,
    #[serde(skip)]
    pub fixed_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionResult>,
    pub success: bool,
    /// Set when the unit could not be processed at all (e.g. unreadable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub processing_ms: f64,
}

impl PipelineResult {
    /// Result for a unit that never produced any text.
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        let empty = ValidationReport::from_issues(&[]);
        Self {
            name: name.into(),
            syntax_valid: false,
            recovered: false,
            validation: empty.clone(),
            fix_summary: FixSummary::not_fixable(0),
            remaining: empty,
            fixed_text: None,
            execution: None,
            success: false,
            error: Some(error.into()),
            processing_ms: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageCounts {
    pub passed: usize,
    pub failed: usize,
    pub rate: f64,
}

impl StageCounts {
    fn tally(outcomes: impl Iterator<Item = bool>) -> Self {
        let (mut passed, mut failed) = (0, 0);
        for ok in outcomes {
            if ok {
                passed += 1;
            } else {
                failed += 1;
            }
        }
        let attempted = passed + failed;
        let rate = if attempted == 0 {
            0.0
        } else {
            passed as f64 / attempted as f64
        };
        Self { passed, failed, rate }
    }
}

/// Aggregate over a batch. Built once, after every unit completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total_units: usize,
    pub parse: StageCounts,
    pub validation: StageCounts,
    pub fix: StageCounts,
    /// Only units where execution was attempted.
    pub execution: StageCounts,
    pub overall: StageCounts,
    pub avg_processing_ms: f64,
    pub results: Vec<PipelineResult>,
}

impl BatchReport {
    pub fn from_results(results: Vec<PipelineResult>) -> Self {
        let total_units = results.len();
        let parse = StageCounts::tally(results.iter().map(|r| r.syntax_valid));
        let validation = StageCounts::tally(
            results
                .iter()
                .filter(|r| r.syntax_valid)
                .map(|r| r.validation.is_clean()),
        );
        // Units that needed fixing: did the Fix stage clear them?
        let fix = StageCounts::tally(
            results
                .iter()
                .filter(|r| r.syntax_valid && !r.validation.is_clean())
                .map(|r| r.fix_summary.remaining_issues == 0),
        );
        let execution = StageCounts::tally(
            results
                .iter()
                .filter_map(|r| r.execution.as_ref())
                .map(|e| e.success),
        );
        let overall = StageCounts::tally(results.iter().map(|r| r.success));
        let avg_processing_ms = if total_units == 0 {
            0.0
        } else {
            results.iter().map(|r| r.processing_ms).sum::<f64>() / total_units as f64
        };

        Self {
            total_units,
            parse,
            validation,
            fix,
            execution,
            overall,
            avg_processing_ms,
            results,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.overall.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_has_zero_rates() {
        let report = BatchReport::from_results(Vec::new());
        assert_eq!(report.total_units, 0);
        assert_eq!(report.overall.rate, 0.0);
        assert_eq!(report.avg_processing_ms, 0.0);
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_failed_unit_counts_against_parse_and_overall() {
        let report = BatchReport::from_results(vec![PipelineResult::failed("a.py", "unreadable")]);
        assert_eq!(report.parse.failed, 1);
        assert_eq!(report.overall.failed, 1);
        assert_eq!(report.validation.passed + report.validation.failed, 0);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn test_fixed_text_is_not_serialized() {
        let mut result = PipelineResult::failed("a.py", "x");
        result.fixed_text = Some("pass\n".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("fixed_text").is_none());
        assert_eq!(json["fix_summary"]["status"], "not-fixable");
    }
}
