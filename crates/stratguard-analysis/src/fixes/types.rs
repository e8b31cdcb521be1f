//! Fix: a proposed textual patch for exactly one issue.

use serde::{Deserialize, Serialize};

use crate::issues::Issue;

/// How safe a fix is to apply without review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixType {
    /// Applied automatically at or above the caller's threshold.
    Auto,
    /// Needs review.
    SemiAuto,
    /// Never applied automatically.
    ManualOnly,
}

impl FixType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::SemiAuto => "SEMI_AUTO",
            Self::ManualOnly => "MANUAL_ONLY",
        }
    }
}

impl std::fmt::Display for FixType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The edit a fix performs, derived from its fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Empty original: insert the replacement lines before `line`.
    Insert,
    /// Empty replacement: delete `line..=end_line`.
    Delete,
    /// Replace `line..=end_line` with the replacement lines.
    Replace,
    /// Suggestion only; the text is left untouched.
    NoChange,
}

/// A proposed remediation. Fragments hold whole lines joined with `\n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub issue: Issue,
    pub fix_type: FixType,
    pub confidence: f64,
    pub original: String,
    pub replacement: String,
    pub explanation: String,
    /// Set by the applier, never by a generator.
    pub applied: bool,
    /// First target line, 1-indexed. For insertions, the line the new text
    /// goes in front of (one past the end appends).
    pub line: u32,
    /// Last target line, inclusive. Equal to `line` for insertions.
    pub end_line: u32,
    /// Id of the generator that produced this fix.
    pub generator: String,
}

impl Fix {
    fn base(issue: &Issue, line: u32, end_line: u32, original: String, replacement: String) -> Self {
        Self {
            issue: issue.clone(),
            fix_type: FixType::ManualOnly,
            confidence: 0.0,
            original,
            replacement,
            explanation: String::new(),
            applied: false,
            line,
            end_line,
            generator: String::new(),
        }
    }

    /// Replace lines `line..=end_line` (1-indexed) with `replacement`.
    pub fn replace(issue: &Issue, line: u32, end_line: u32, original: &[String], replacement: &[String]) -> Self {
        Self::base(issue, line, end_line, original.join("\n"), replacement.join("\n"))
    }

    /// Delete lines `line..=end_line`.
    pub fn delete(issue: &Issue, line: u32, end_line: u32, original: &[String]) -> Self {
        Self::base(issue, line, end_line, original.join("\n"), String::new())
    }

    /// Insert `new_lines` in front of `before`.
    pub fn insert(issue: &Issue, before: u32, new_lines: &[String]) -> Self {
        Self::base(issue, before, before, String::new(), new_lines.join("\n"))
    }

    /// A suggestion that leaves `line` untouched.
    pub fn suggestion(issue: &Issue, line: u32, text: &str) -> Self {
        Self::base(issue, line, line, text.to_string(), text.to_string())
    }

    /// Classify the fix. AUTO below `auto_floor` is downgraded to SEMI_AUTO,
    /// so an AUTO fix always meets its generator's floor.
    pub fn classified(mut self, fix_type: FixType, confidence: f64, auto_floor: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self.fix_type = if fix_type == FixType::Auto && self.confidence < auto_floor {
            FixType::SemiAuto
        } else {
            fix_type
        };
        self
    }

    pub fn explained(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn from_generator(mut self, id: &str) -> Self {
        self.generator = id.to_string();
        self
    }

    pub fn edit_kind(&self) -> EditKind {
        if self.original.is_empty() {
            EditKind::Insert
        } else if self.replacement.is_empty() {
            EditKind::Delete
        } else if self.original == self.replacement {
            EditKind::NoChange
        } else {
            EditKind::Replace
        }
    }

    /// Replacement fragment split back into lines.
    pub fn replacement_lines(&self) -> Vec<String> {
        if self.replacement.is_empty() {
            Vec::new()
        } else {
            self.replacement.split('\n').map(str::to_string).collect()
        }
    }

    /// Whether the applier may apply this fix at `threshold`.
    pub fn is_eligible(&self, threshold: f64) -> bool {
        self.fix_type == FixType::Auto
            && self.confidence >= threshold
            && self.edit_kind() != EditKind::NoChange
    }
}

/// An issue a generator claimed but produced no fix for, or that no
/// generator claims at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixGenerationFailure {
    pub issue: Issue,
    /// `None` when no generator claims the category.
    pub generator: Option<String>,
    pub reason: String,
}

/// Why the applier skipped an eligible fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictReason {
    /// Target span overlaps a higher-confidence fix.
    Overlap,
    /// Another insertion targets the same line.
    DuplicateInsert,
    /// Target span lies outside the file.
    OutOfRange,
}

/// A fix skipped by the applier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixConflict {
    pub reason: ConflictReason,
    pub skipped_line: u32,
    pub skipped_generator: String,
    pub skipped_confidence: f64,
    /// Line of the fix that won, when the conflict was with another fix.
    pub kept_line: Option<u32>,
}
