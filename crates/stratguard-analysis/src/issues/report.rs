//! ValidationReport: pure aggregation over an issue list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stratguard_core::Severity;

use super::types::{Issue, IssueCategory};

/// Per-severity and per-category counts plus the full issue list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_issues: usize,
    /// Every severity is present, zero counts included.
    pub by_severity: BTreeMap<Severity, usize>,
    /// Only categories that occurred.
    pub by_category: BTreeMap<String, usize>,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut by_severity: BTreeMap<Severity, usize> =
            Severity::all().iter().map(|s| (*s, 0)).collect();
        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();

        for issue in issues {
            *by_severity.entry(issue.severity).or_default() += 1;
            *by_category.entry(issue.category.name().to_string()).or_default() += 1;
        }

        Self {
            total_issues: issues.len(),
            by_severity,
            by_category,
            issues: issues.to_vec(),
        }
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn count_category(&self, category: &IssueCategory) -> usize {
        self.by_category.get(category.name()).copied().unwrap_or(0)
    }

    /// Highest severity present, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }

    /// Issues at or above `min`.
    pub fn blocking_count(&self, min: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity >= min).count()
    }

    pub fn is_clean(&self) -> bool {
        self.total_issues == 0
    }
}
