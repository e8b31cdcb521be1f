//! PipelineOrchestrator: Parse → Validate → Fix → Execute per unit.
//!
//! Every stage is a gate. Units never share state, so a batch is either a
//! plain loop or a rayon map; the report is aggregated once at the end.

use std::time::Instant;

use rayon::prelude::*;

use stratguard_core::config::PipelineConfig;
use stratguard_core::StratguardConfig;

use crate::fixes::{
    create_default_fixers, Fix, FixApplier, FixConflict, FixGenerationFailure, FixProposals,
    FixerRegistry,
};
use crate::issues::{Issue, ValidationReport};
use crate::parsers::{SourceParser, SourceUnit};
use crate::runner::CodeRunner;
use crate::validator::{syntax_issue, Validator};

use super::io::{LoadedInput, SourceInput};
use super::types::{BatchReport, ExecutionResult, FixStatus, FixSummary, PipelineResult};

pub struct PipelineOrchestrator {
    options: PipelineConfig,
    parser: SourceParser,
    validator: Validator,
    fixers: FixerRegistry,
    runner: Option<Box<dyn CodeRunner>>,
}

/// Fixes generated and applied across one unit's passes.
#[derive(Default)]
struct FixLedger {
    fixes: Vec<Fix>,
    failures: Vec<FixGenerationFailure>,
    conflicts: Vec<FixConflict>,
    applied: usize,
}

impl FixLedger {
    /// Position to roll back to if a later pass is discarded.
    fn mark(&self) -> (usize, usize) {
        (self.fixes.len(), self.applied)
    }

    /// Forget applications made since `mark`; their output was thrown away.
    fn revoke_since(&mut self, (fixes, applied): (usize, usize)) {
        self.applied = applied;
        for fix in &mut self.fixes[fixes..] {
            fix.applied = false;
        }
    }

    fn into_summary(self, status: FixStatus, before: usize, remaining: usize) -> FixSummary {
        FixSummary {
            status,
            generated: self.fixes.len(),
            applied: self.applied,
            remaining_issues: remaining,
            conflicts: self.conflicts,
            failures: self.failures,
            delta: before as i64 - remaining as i64,
            fixes: self.fixes,
        }
    }
}

impl PipelineOrchestrator {
    pub fn new(config: &StratguardConfig) -> Self {
        Self {
            options: config.pipeline.clone(),
            parser: SourceParser::with_cache_capacity(config.pipeline.parse_cache_capacity),
            validator: Validator::new(config.validator.clone()),
            fixers: create_default_fixers(&config.fixer, &config.validator),
            runner: None,
        }
    }

    /// Attach the Execute-stage collaborator.
    pub fn with_runner(mut self, runner: Box<dyn CodeRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn options(&self) -> &PipelineConfig {
        &self.options
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn fixers(&self) -> &FixerRegistry {
        &self.fixers
    }

    /// Run one unit through every stage.
    pub fn process_unit(&self, name: &str, text: &str) -> PipelineResult {
        let started = Instant::now();
        let mut result = self.run_stages(name, text);
        result.processing_ms = started.elapsed().as_secs_f64() * 1_000.0;

        tracing::info!(
            unit = name,
            syntax_valid = result.syntax_valid,
            issues = result.validation.total_issues,
            applied = result.fix_summary.applied,
            remaining = result.fix_summary.remaining_issues,
            success = result.success,
            "unit processed"
        );
        result
    }

    pub fn process_batch(&self, inputs: &[SourceInput]) -> BatchReport {
        let results: Vec<PipelineResult> = if self.options.parallel {
            inputs
                .par_iter()
                .map(|input| self.process_unit(&input.name, &input.text))
                .collect()
        } else {
            inputs
                .iter()
                .map(|input| self.process_unit(&input.name, &input.text))
                .collect()
        };
        self.aggregate(results)
    }

    /// Like [`Self::process_batch`], keeping unreadable entries as failed units.
    pub fn process_loaded(&self, inputs: &[LoadedInput]) -> BatchReport {
        let process = |input: &LoadedInput| match input {
            LoadedInput::Source(source) => self.process_unit(&source.name, &source.text),
            LoadedInput::Unreadable { name, message } => PipelineResult::failed(name.clone(), message.clone()),
        };
        let results: Vec<PipelineResult> = if self.options.parallel {
            inputs.par_iter().map(process).collect()
        } else {
            inputs.iter().map(process).collect()
        };
        self.aggregate(results)
    }

    fn aggregate(&self, results: Vec<PipelineResult>) -> BatchReport {
        let report = BatchReport::from_results(results);
        tracing::info!(
            units = report.total_units,
            passed = report.overall.passed,
            failed = report.overall.failed,
            avg_ms = report.avg_processing_ms,
            "batch complete"
        );
        report
    }

    fn run_stages(&self, name: &str, text: &str) -> PipelineResult {
        // Parse
        let mut unit = self.parser.parse_unit(name, text);
        tracing::debug!(
            unit = name,
            hash = unit.content_hash(),
            lines = unit.line_count(),
            "parsed"
        );
        let mut ledger = FixLedger::default();
        // Issues of the text as given, when it only parsed after recovery.
        let mut recovered_from: Option<Vec<Issue>> = None;

        if !unit.is_valid() {
            let mut issues: Vec<Issue> = syntax_issue(&unit).into_iter().collect();
            if self.options.recover_syntax_errors {
                issues.extend(self.validator.validate_text_only(&unit));
                let mark = ledger.mark();
                if let Some(candidate) = self.recover(&unit, &issues, &mut ledger) {
                    tracing::warn!(unit = name, "syntax error recovered by text-level fixes");
                    unit = candidate;
                    recovered_from = Some(issues);
                } else {
                    ledger.revoke_since(mark);
                    return self.not_fixable(name, issues, ledger);
                }
            } else {
                return self.not_fixable(name, issues, ledger);
            }
        }

        // Validate
        let issues = self.validator.validate(&unit);
        let recovered = recovered_from.is_some();
        let input_issues = recovered_from.unwrap_or_else(|| issues.clone());
        let validation = Validator::report(&input_issues);

        // Fix
        let mut changed = recovered;
        let remaining_issues = if issues.is_empty() {
            Vec::new()
        } else {
            let mark = ledger.mark();
            match self.fix_pass(&issues, &unit, &mut ledger) {
                Some(patched) => {
                    let candidate = self.parser.parse_unit(name, &patched);
                    if candidate.is_valid() {
                        changed = true;
                        unit = candidate;
                        self.validator.validate(&unit)
                    } else {
                        tracing::warn!(unit = name, "patched text no longer parses, patch discarded");
                        ledger.revoke_since(mark);
                        issues.clone()
                    }
                }
                None => issues.clone(),
            }
        };
        let remaining = Validator::report(&remaining_issues);

        let status = if input_issues.is_empty() {
            FixStatus::Skipped
        } else if ledger.applied > 0 || recovered {
            FixStatus::Applied
        } else {
            FixStatus::Proposed
        };
        let fix_summary = ledger.into_summary(status, input_issues.len(), remaining.total_issues);
        let clear = remaining.blocking_count(self.options.blocking_severity) == 0;

        // Execute
        let execution = if self.options.execute && clear {
            self.execute(name, &unit)
        } else {
            None
        };
        let executed_ok = execution.as_ref().map_or(true, |e| e.success);

        PipelineResult {
            name: name.to_string(),
            syntax_valid: true,
            recovered,
            validation,
            fix_summary,
            remaining,
            fixed_text: changed.then(|| unit.text().to_string()),
            execution,
            success: clear && executed_ok,
            error: None,
            processing_ms: 0.0,
        }
    }

    /// Text-level repair of a unit that failed to parse. Returns the patched
    /// unit only when it now parses.
    fn recover(&self, unit: &SourceUnit, issues: &[Issue], ledger: &mut FixLedger) -> Option<SourceUnit> {
        let patched = self.fix_pass(issues, unit, ledger)?;
        let candidate = self.parser.parse_unit(unit.name(), &patched);
        candidate.is_valid().then_some(candidate)
    }

    /// Generate fixes for `issues` and, with auto-apply on, apply the
    /// eligible ones. Returns the patched text when anything changed.
    fn fix_pass(&self, issues: &[Issue], unit: &SourceUnit, ledger: &mut FixLedger) -> Option<String> {
        let FixProposals { mut fixes, failures } = self.fixers.generate_all(issues, unit.lines());
        for failure in &failures {
            tracing::debug!(unit = unit.name(), line = failure.issue.line, reason = %failure.reason, "no fix");
        }

        let patched = if self.options.auto_apply {
            let patch = FixApplier::apply(unit.lines(), &mut fixes, self.options.confidence_threshold);
            ledger.applied += patch.applied_count();
            let text = patch.is_changed().then(|| patch.render(unit.trailing_newline()));
            ledger.conflicts.extend(patch.conflicts);
            text
        } else {
            None
        };

        ledger.fixes.extend(fixes);
        ledger.failures.extend(failures);
        patched
    }

    fn execute(&self, name: &str, unit: &SourceUnit) -> Option<ExecutionResult> {
        let Some(runner) = &self.runner else {
            tracing::warn!(unit = name, "execution requested but no runner configured");
            return None;
        };
        let started = Instant::now();
        let outcome = runner.run(unit.text());
        let result = ExecutionResult::from_outcome(outcome, started.elapsed().as_millis() as u64);
        if result.success {
            tracing::info!(unit = name, duration_ms = result.duration_ms, "execution succeeded");
        } else {
            tracing::warn!(
                unit = name,
                kind = ?result.kind,
                message = result.message.as_deref().unwrap_or(""),
                "execution failed"
            );
        }
        Some(result)
    }

    fn not_fixable(&self, name: &str, issues: Vec<Issue>, ledger: FixLedger) -> PipelineResult {
        tracing::info!(unit = name, "parse failed, unit not fixable");
        let report: ValidationReport = Validator::report(&issues);
        let count = report.total_issues;
        PipelineResult {
            name: name.to_string(),
            syntax_valid: false,
            recovered: false,
            validation: report.clone(),
            fix_summary: ledger.into_summary(FixStatus::NotFixable, count, count),
            remaining: report,
            fixed_text: None,
            execution: None,
            success: false,
            error: None,
            processing_ms: 0.0,
        }
    }
}

impl Default for PipelineOrchestrator {
    fn default() -> Self {
        Self::new(&StratguardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunOutcome;

    const CLEAN: &str = "import backtrader as bt\n\nclass S(bt.Strategy):\n    def __init__(self):\n        self.order = None\n\n    def next(self):\n        if self.order:\n            return\n        self.buy()\n";

    #[test]
    fn test_clean_unit_skips_fix_stage() {
        let result = PipelineOrchestrator::default().process_unit("clean.py", CLEAN);
        assert!(result.syntax_valid);
        assert!(result.success);
        assert_eq!(result.fix_summary.status, FixStatus::Skipped);
        assert!(result.fixed_text.is_none());
    }

    #[test]
    fn test_parse_failure_is_terminal_by_default() {
        let result = PipelineOrchestrator::default().process_unit("bad.py", "def f(:\n    pass\n");
        assert!(!result.syntax_valid);
        assert!(!result.success);
        assert_eq!(result.fix_summary.status, FixStatus::NotFixable);
        assert_eq!(result.validation.total_issues, 1);
    }

    #[test]
    fn test_execute_runs_only_when_requested() {
        let mut config = StratguardConfig::default();
        config.pipeline.execute = true;
        let runner = |_: &str| RunOutcome::Success { metrics: serde_json::json!({"trades": 3}) };
        let orchestrator = PipelineOrchestrator::new(&config).with_runner(Box::new(runner));
        let result = orchestrator.process_unit("clean.py", CLEAN);
        let execution = result.execution.expect("execution attempted");
        assert!(execution.success);
        assert_eq!(execution.metrics["trades"], 3);
    }
}
