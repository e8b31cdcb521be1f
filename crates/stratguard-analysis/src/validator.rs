//! Validator: runs every enabled detector over one unit.

use stratguard_core::config::ValidatorConfig;
use stratguard_core::Severity;

use crate::detectors::{create_default_registry, DetectionContext, DetectionMode, DetectorRegistry};
use crate::issues::{Issue, IssueCategory, ValidationReport};
use crate::parsers::SourceUnit;

pub struct Validator {
    config: ValidatorConfig,
    registry: DetectorRegistry,
}

impl Validator {
    /// Validator with every built-in detector not disabled by `config`.
    pub fn new(config: ValidatorConfig) -> Self {
        let registry = create_default_registry(&config);
        Self { config, registry }
    }

    pub fn with_registry(config: ValidatorConfig, registry: DetectorRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// A unit that failed to parse yields only its syntax-error issue.
    /// Otherwise issues come back in detector-registration order.
    pub fn validate(&self, unit: &SourceUnit) -> Vec<Issue> {
        if let Some(issue) = syntax_issue(unit) {
            return vec![issue];
        }
        let ctx = DetectionContext::new(unit, &self.config);
        let issues = self.registry.run_all(&ctx);
        clamp_lines(unit, issues)
    }

    /// Text-mode detectors only. Works whether or not the unit parsed.
    pub fn validate_text_only(&self, unit: &SourceUnit) -> Vec<Issue> {
        let ctx = DetectionContext::new(unit, &self.config);
        let issues = self.registry.run_mode(DetectionMode::Text, &ctx);
        clamp_lines(unit, issues)
    }

    pub fn report(issues: &[Issue]) -> ValidationReport {
        ValidationReport::from_issues(issues)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

/// The CRITICAL syntax-error issue for a unit that failed to parse.
pub fn syntax_issue(unit: &SourceUnit) -> Option<Issue> {
    let diag = unit.parse_error()?;
    let line = clamp(diag.line, unit.line_count());
    let mut issue = Issue::new(
        Severity::Critical,
        IssueCategory::SyntaxError,
        line,
        format!("syntax error at line {}, column {}: {}", diag.line, diag.column, diag.message),
    );
    if let Some(text) = unit.line(line as usize) {
        issue = issue.with_snippet(text.trim());
    }
    Some(issue)
}

fn clamp(line: u32, line_count: usize) -> u32 {
    let max = line_count.max(1) as u32;
    line.clamp(1, max)
}

fn clamp_lines(unit: &SourceUnit, issues: Vec<Issue>) -> Vec<Issue> {
    issues
        .into_iter()
        .map(|mut issue| {
            let clamped = clamp(issue.line, unit.line_count());
            if clamped != issue.line {
                tracing::debug!(
                    unit = unit.name(),
                    category = %issue.category,
                    line = issue.line,
                    clamped,
                    "issue line outside unit"
                );
                issue.line = clamped;
            }
            issue
        })
        .collect()
}
