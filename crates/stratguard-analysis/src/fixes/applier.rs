//! FixApplier: applies eligible fixes bottom-up so earlier line numbers
//! stay valid without any remapping.

use std::cmp::Ordering;

use crate::parsers::source_unit::join_lines;

use super::types::{ConflictReason, EditKind, Fix, FixConflict};

/// Result of one application pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPatch {
    pub lines: Vec<String>,
    /// Indexes into the fix slice, in application order.
    pub applied: Vec<usize>,
    pub conflicts: Vec<FixConflict>,
}

impl AppliedPatch {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn is_changed(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Reassemble the patched text.
    pub fn render(&self, trailing_newline: bool) -> String {
        join_lines(&self.lines, trailing_newline)
    }
}

pub struct FixApplier;

impl FixApplier {
    /// Apply every fix that is AUTO with `confidence >= threshold`.
    ///
    /// Overlapping fixes are resolved greedily by confidence; losers are
    /// reported as conflicts. Survivors are applied in strictly descending
    /// line order, with replacements and deletions before an insertion at
    /// the same line. Each applied fix has `applied` set.
    pub fn apply(lines: &[String], fixes: &mut [Fix], threshold: f64) -> AppliedPatch {
        let mut candidates: Vec<usize> = (0..fixes.len())
            .filter(|&i| fixes[i].is_eligible(threshold))
            .collect();
        // Highest confidence first; ties keep input order.
        candidates.sort_by(|&a, &b| {
            fixes[b]
                .confidence
                .partial_cmp(&fixes[a].confidence)
                .unwrap_or(Ordering::Equal)
        });

        let mut accepted: Vec<usize> = Vec::new();
        let mut conflicts = Vec::new();
        for idx in candidates {
            let fix = &fixes[idx];
            if !in_range(fix, lines.len()) {
                tracing::warn!(
                    generator = %fix.generator,
                    line = fix.line,
                    end_line = fix.end_line,
                    "fix targets lines outside the file, skipped"
                );
                conflicts.push(conflict(fix, ConflictReason::OutOfRange, None));
                continue;
            }
            let clash = accepted
                .iter()
                .find_map(|&kept| clash_reason(&fixes[kept], fix).map(|reason| (kept, reason)));
            if let Some((kept, reason)) = clash {
                let winner = &fixes[kept];
                tracing::warn!(
                    skipped = %fix.generator,
                    skipped_line = fix.line,
                    skipped_confidence = fix.confidence,
                    kept = %winner.generator,
                    kept_line = winner.line,
                    "conflicting fix skipped"
                );
                conflicts.push(conflict(fix, reason, Some(winner.line)));
                continue;
            }
            accepted.push(idx);
        }

        accepted.sort_by(|&a, &b| application_order(&fixes[a], &fixes[b]));

        let mut patched = lines.to_vec();
        for &idx in &accepted {
            let fix = &mut fixes[idx];
            let start = fix.line as usize - 1;
            let end = fix.end_line as usize;
            match fix.edit_kind() {
                EditKind::Insert => {
                    let new_lines = fix.replacement_lines();
                    patched.splice(start..start, new_lines);
                }
                EditKind::Delete => {
                    patched.drain(start..end);
                }
                EditKind::Replace => {
                    let new_lines = fix.replacement_lines();
                    patched.splice(start..end, new_lines);
                }
                EditKind::NoChange => continue,
            }
            fix.applied = true;
            tracing::debug!(generator = %fix.generator, line = fix.line, "fix applied");
        }

        AppliedPatch {
            lines: patched,
            applied: accepted,
            conflicts,
        }
    }
}

fn in_range(fix: &Fix, line_count: usize) -> bool {
    let (line, end) = (fix.line as usize, fix.end_line as usize);
    match fix.edit_kind() {
        EditKind::Insert => line >= 1 && line <= line_count + 1,
        _ => line >= 1 && line <= end && end <= line_count,
    }
}

/// Why `candidate` cannot be applied alongside `kept`, if it cannot.
fn clash_reason(kept: &Fix, candidate: &Fix) -> Option<ConflictReason> {
    let kept_insert = kept.edit_kind() == EditKind::Insert;
    let cand_insert = candidate.edit_kind() == EditKind::Insert;
    match (kept_insert, cand_insert) {
        (true, true) => (kept.line == candidate.line).then_some(ConflictReason::DuplicateInsert),
        // An insertion may sit in front of a span, not inside it.
        (true, false) => (candidate.line < kept.line && kept.line <= candidate.end_line)
            .then_some(ConflictReason::Overlap),
        (false, true) => (kept.line < candidate.line && candidate.line <= kept.end_line)
            .then_some(ConflictReason::Overlap),
        (false, false) => (kept.line <= candidate.end_line && candidate.line <= kept.end_line)
            .then_some(ConflictReason::Overlap),
    }
}

/// Descending line; at equal lines edits come before insertions.
fn application_order(a: &Fix, b: &Fix) -> Ordering {
    let a_insert = a.edit_kind() == EditKind::Insert;
    let b_insert = b.edit_kind() == EditKind::Insert;
    b.line.cmp(&a.line).then(a_insert.cmp(&b_insert))
}

fn conflict(fix: &Fix, reason: ConflictReason, kept_line: Option<u32>) -> FixConflict {
    FixConflict {
        reason,
        skipped_line: fix.line,
        skipped_generator: fix.generator.clone(),
        skipped_confidence: fix.confidence,
        kept_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixes::types::FixType;
    use crate::issues::{Issue, IssueCategory};
    use stratguard_core::Severity;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    fn issue(line: u32) -> Issue {
        Issue::new(Severity::High, IssueCategory::Custom("test".into()), line, "t")
    }

    fn replace(line: u32, with: &str, confidence: f64) -> Fix {
        Fix::replace(&issue(line), line, line, &["x".to_string()], &[with.to_string()])
            .classified(FixType::Auto, confidence, 0.0)
    }

    #[test]
    fn test_overlap_keeps_higher_confidence() {
        let src = lines("a\nb\nc");
        let mut fixes = vec![replace(2, "low", 0.85), replace(2, "high", 0.95)];
        let patch = FixApplier::apply(&src, &mut fixes, 0.80);
        assert_eq!(patch.lines, lines("a\nhigh\nc"));
        assert!(!fixes[0].applied);
        assert!(fixes[1].applied);
        assert_eq!(patch.conflicts.len(), 1);
        assert_eq!(patch.conflicts[0].reason, ConflictReason::Overlap);
        assert_eq!(patch.conflicts[0].kept_line, Some(2));
    }

    #[test]
    fn test_replace_before_insert_at_same_line() {
        let src = lines("a\nb");
        let mut fixes = vec![
            Fix::insert(&issue(2), 2, &["new".to_string()]).classified(FixType::Auto, 0.9, 0.0),
            replace(2, "B", 0.9),
        ];
        let patch = FixApplier::apply(&src, &mut fixes, 0.80);
        assert_eq!(patch.lines, lines("a\nnew\nB"));
        assert!(patch.conflicts.is_empty());
    }

    #[test]
    fn test_duplicate_inserts_conflict() {
        let src = lines("a");
        let mut fixes = vec![
            Fix::insert(&issue(1), 1, &["x".to_string()]).classified(FixType::Auto, 0.9, 0.0),
            Fix::insert(&issue(1), 1, &["y".to_string()]).classified(FixType::Auto, 0.95, 0.0),
        ];
        let patch = FixApplier::apply(&src, &mut fixes, 0.80);
        assert_eq!(patch.lines, lines("y\na"));
        assert_eq!(patch.conflicts[0].reason, ConflictReason::DuplicateInsert);
    }

    #[test]
    fn test_out_of_range_fix_is_skipped() {
        let src = lines("a");
        let mut fixes = vec![replace(5, "z", 0.9)];
        let patch = FixApplier::apply(&src, &mut fixes, 0.80);
        assert_eq!(patch.lines, src);
        assert_eq!(patch.conflicts[0].reason, ConflictReason::OutOfRange);
        assert!(!patch.is_changed());
    }

    #[test]
    fn test_append_insert_past_last_line() {
        let src = lines("a");
        let mut fixes = vec![Fix::insert(&issue(2), 2, &["b".to_string()]).classified(FixType::Auto, 0.9, 0.0)];
        let patch = FixApplier::apply(&src, &mut fixes, 0.80);
        assert_eq!(patch.render(true), "a\nb\n");
    }
}
