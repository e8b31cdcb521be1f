//! Plain-text rendering for terminal output.

use std::fmt::Write;

use stratguard_analysis::pipeline::{BatchReport, PipelineResult, StageCounts};
use stratguard_analysis::Issue;

use crate::commands::ValidateEntry;

pub fn render_validation(entries: &[ValidateEntry]) -> String {
    let mut out = String::new();
    let mut total = 0;
    for entry in entries {
        match (&entry.report, &entry.error) {
            (Some(report), _) if report.is_clean() => {
                let _ = writeln!(out, "{}: ok", entry.name);
            }
            (Some(report), _) => {
                total += report.total_issues;
                for issue in &report.issues {
                    write_issue(&mut out, &entry.name, issue);
                }
            }
            (None, error) => {
                let _ = writeln!(out, "{}: error: {}", entry.name, error.as_deref().unwrap_or("unreadable"));
            }
        }
    }
    let _ = writeln!(out, "{} file(s), {} issue(s)", entries.len(), total);
    out
}

pub fn render_fixes(report: &BatchReport) -> String {
    let mut out = String::new();
    for result in &report.results {
        write_result_header(&mut out, result);
        for fix in &result.fix_summary.fixes {
            let _ = writeln!(
                out,
                "  line {}: {} {} ({:.2}) {}",
                fix.line,
                fix.generator,
                fix.fix_type,
                fix.confidence,
                if fix.applied { "applied" } else { "proposed" }
            );
        }
        for conflict in &result.fix_summary.conflicts {
            let _ = writeln!(
                out,
                "  line {}: {} skipped ({:?})",
                conflict.skipped_line, conflict.skipped_generator, conflict.reason
            );
        }
        for issue in &result.remaining.issues {
            write_issue(&mut out, &result.name, issue);
        }
    }
    write_summary(&mut out, report);
    out
}

pub fn render_batch(report: &BatchReport) -> String {
    let mut out = String::new();
    for result in &report.results {
        write_result_header(&mut out, result);
        if let Some(execution) = &result.execution {
            match (&execution.kind, &execution.message) {
                (Some(kind), Some(message)) => {
                    let _ = writeln!(out, "  execute: {} {}", kind.name(), message);
                }
                _ => {
                    let _ = writeln!(out, "  execute: ok ({} ms)", execution.duration_ms);
                }
            }
        }
    }
    write_stage(&mut out, "parse", &report.parse);
    write_stage(&mut out, "validate", &report.validation);
    write_stage(&mut out, "fix", &report.fix);
    if report.execution.passed + report.execution.failed > 0 {
        write_stage(&mut out, "execute", &report.execution);
    }
    write_summary(&mut out, report);
    out
}

fn write_result_header(out: &mut String, result: &PipelineResult) {
    let verdict = if result.success { "ok" } else { "FAILED" };
    if let Some(error) = &result.error {
        let _ = writeln!(out, "{}: {} ({})", result.name, verdict, error);
        return;
    }
    let _ = writeln!(
        out,
        "{}: {} (issues {}, applied {}, remaining {}{})",
        result.name,
        verdict,
        result.validation.total_issues,
        result.fix_summary.applied,
        result.fix_summary.remaining_issues,
        if result.recovered { ", recovered" } else { "" }
    );
}

fn write_issue(out: &mut String, name: &str, issue: &Issue) {
    let _ = writeln!(
        out,
        "{}:{}: {} [{}] {}",
        name, issue.line, issue.severity, issue.category, issue.message
    );
    if let Some(suggestion) = &issue.suggestion {
        let _ = writeln!(out, "    help: {suggestion}");
    }
}

fn write_stage(out: &mut String, stage: &str, counts: &StageCounts) {
    let _ = writeln!(
        out,
        "{stage:<9} {} passed, {} failed ({:.0}%)",
        counts.passed,
        counts.failed,
        counts.rate * 100.0
    );
}

fn write_summary(out: &mut String, report: &BatchReport) {
    let _ = writeln!(
        out,
        "{} unit(s): {} ok, {} failed, avg {:.1} ms",
        report.total_units, report.overall.passed, report.overall.failed, report.avg_processing_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratguard_analysis::issues::{IssueCategory, ValidationReport};
    use stratguard_analysis::pipeline::PipelineResult;
    use stratguard_core::Severity;

    #[test]
    fn test_validation_lines_include_location_and_help() {
        let issue = Issue::new(Severity::Medium, IssueCategory::MissingFieldInit, 4, "no init")
            .with_suggestion("add it");
        let entries = vec![
            ValidateEntry {
                name: "a.py".to_string(),
                report: Some(ValidationReport::from_issues(&[issue])),
                error: None,
            },
            ValidateEntry {
                name: "b.py".to_string(),
                report: None,
                error: Some("permission denied".to_string()),
            },
        ];
        let text = render_validation(&entries);
        assert!(text.contains("a.py:4: MEDIUM [missing-field-init] no init\n"));
        assert!(text.contains("    help: add it\n"));
        assert!(text.contains("b.py: error: permission denied\n"));
        assert!(text.ends_with("2 file(s), 1 issue(s)\n"));
    }

    #[test]
    fn test_batch_summary_counts() {
        let report = BatchReport::from_results(vec![PipelineResult::failed("x.py", "unreadable")]);
        let text = render_batch(&report);
        assert!(text.starts_with("x.py: FAILED (unreadable)\n"));
        assert!(text.contains("1 unit(s): 0 ok, 1 failed"));
    }
}
