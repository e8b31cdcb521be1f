//! Issue: one detected structural defect. The universal detector output.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use stratguard_core::Severity;

/// Defect category. Open enumeration: unknown names round-trip through
/// `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueCategory {
    OrphanedBranch,
    MethodBoundaryConfusion,
    UndefinedVariable,
    MissingRequiredMethod,
    MissingFieldInit,
    MissingGuardCheck,
    IndentationMismatch,
    SyntaxError,
    Custom(String),
}

impl IssueCategory {
    /// All built-in categories.
    pub fn builtin() -> &'static [IssueCategory] {
        &[
            Self::OrphanedBranch,
            Self::MethodBoundaryConfusion,
            Self::UndefinedVariable,
            Self::MissingRequiredMethod,
            Self::MissingFieldInit,
            Self::MissingGuardCheck,
            Self::IndentationMismatch,
            Self::SyntaxError,
        ]
    }

    /// Category name as a string.
    pub fn name(&self) -> &str {
        match self {
            Self::OrphanedBranch => "orphaned-branch",
            Self::MethodBoundaryConfusion => "method-boundary-confusion",
            Self::UndefinedVariable => "undefined-variable",
            Self::MissingRequiredMethod => "missing-required-method",
            Self::MissingFieldInit => "missing-field-init",
            Self::MissingGuardCheck => "missing-guard-check",
            Self::IndentationMismatch => "indentation-mismatch",
            Self::SyntaxError => "syntax-error",
            Self::Custom(name) => name,
        }
    }

    /// Parse from string. Never fails: unknown names become `Custom`.
    pub fn parse_str(s: &str) -> Self {
        Self::builtin()
            .iter()
            .find(|c| c.name() == s)
            .cloned()
            .unwrap_or_else(|| Self::Custom(s.to_string()))
    }

    /// Branch categories share the same fix policy.
    pub fn is_branch_defect(&self) -> bool {
        matches!(self, Self::OrphanedBranch | Self::MethodBoundaryConfusion)
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for IssueCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for IssueCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse_str(&s))
    }
}

/// A single detected defect. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: IssueCategory,
    /// 1-indexed line in the unit the issue was produced against.
    pub line: u32,
    pub message: String,
    pub snippet: Option<String>,
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(
        severity: Severity,
        category: IssueCategory,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            line,
            message: message.into(),
            snippet: None,
            suggestion: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Zero-based index into a line array.
    pub fn line_index(&self) -> usize {
        (self.line as usize).saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_roundtrip() {
        for cat in IssueCategory::builtin() {
            assert_eq!(&IssueCategory::parse_str(cat.name()), cat);
        }
    }

    #[test]
    fn test_unknown_category_is_custom() {
        let cat = IssueCategory::parse_str("lookahead-bias");
        assert_eq!(cat, IssueCategory::Custom("lookahead-bias".to_string()));
        assert_eq!(cat.name(), "lookahead-bias");
    }

    #[test]
    fn test_issue_serializes_with_kebab_category() {
        let issue = Issue::new(Severity::Critical, IssueCategory::OrphanedBranch, 3, "orphan")
            .with_snippet("elif x:");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["category"], "orphaned-branch");
        assert_eq!(json["severity"], "CRITICAL");
        assert_eq!(json["line"], 3);
        assert_eq!(json["snippet"], "elif x:");
        assert!(json["suggestion"].is_null());
    }
}
