//! Built-in fix generators and the line helpers they share.

mod callback_relocation;
mod field_init;
mod guard_check;
mod indentation_realign;
mod orphaned_branch;
mod undefined_variable;

pub use callback_relocation::CallbackRelocationFixer;
pub use field_init::FieldInitFixer;
pub use guard_check::GuardCheckFixer;
pub use indentation_realign::IndentationRealignFixer;
pub use orphaned_branch::OrphanedBranchFixer;
pub use undefined_variable::UndefinedVariableFixer;

use crate::detectors::branch_scan::is_def_header;
use crate::lines::{indent_unit, indent_width, inline_body, is_code, leading_whitespace, statement_starts};

/// Where new statements go at the top of a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BodyInsertPoint {
    /// 0-based index the new lines are inserted in front of.
    pub index: usize,
    /// Body indentation, verbatim.
    pub indent: String,
    /// One indentation step, for nested statements.
    pub unit: String,
}

/// Top of the body of the `def` at `def_idx`, after a leading docstring.
/// `None` for inline bodies (`def f(self): pass`) or non-def lines.
pub(crate) fn body_insert_point(lines: &[String], def_idx: usize) -> Option<BodyInsertPoint> {
    let header = lines.get(def_idx)?;
    if !is_def_header(header) {
        return None;
    }
    let starts = statement_starts(lines);
    let def_indent = indent_width(header);

    // Multi-line signatures end at the last continuation line.
    let mut header_end = def_idx;
    while header_end + 1 < lines.len() && !starts[header_end + 1] {
        header_end += 1;
    }
    if inline_body(&lines[header_end]).is_some() {
        return None;
    }

    let first = (header_end + 1..lines.len())
        .find(|&i| starts[i] && is_code(&lines[i]))
        .filter(|&i| indent_width(&lines[i]) > def_indent)?;
    let indent = leading_whitespace(&lines[first]).to_string();
    let unit = indent_unit(header, Some(&lines[first]));

    let index = if is_string_statement(&lines[first]) {
        // The docstring ends where the next statement (or blank line) starts.
        (first + 1..lines.len())
            .find(|&i| starts[i])
            .unwrap_or(lines.len())
    } else {
        first
    };
    Some(BodyInsertPoint { index, indent, unit })
}

fn is_string_statement(line: &str) -> bool {
    let trimmed = line.trim_start();
    let unprefixed = trimmed.trim_start_matches(['r', 'R', 'u', 'U', 'b', 'B']);
    unprefixed.starts_with('"') || unprefixed.starts_with('\'')
}

/// Name of the innermost `def` physically enclosing line `idx`.
pub(crate) fn enclosing_def_name(lines: &[String], idx: usize) -> Option<&str> {
    let mut indent = indent_width(lines.get(idx)?);
    let starts = statement_starts(lines);
    for j in (0..idx).rev() {
        if !starts[j] || !is_code(&lines[j]) {
            continue;
        }
        let line_indent = indent_width(&lines[j]);
        if line_indent >= indent {
            continue;
        }
        if is_def_header(&lines[j]) {
            let trimmed = lines[j].trim_start();
            let after = trimmed.strip_prefix("async").map(str::trim_start).unwrap_or(trimmed);
            let name = after.strip_prefix("def")?.trim_start();
            let end = name.find(|c: char| !(c.is_alphanumeric() || c == '_')).unwrap_or(name.len());
            return Some(&name[..end]);
        }
        indent = line_indent;
    }
    None
}

/// Slice `lines[start..=end]` as owned lines.
pub(crate) fn span(lines: &[String], start: usize, end: usize) -> Vec<String> {
    lines[start..=end].to_vec()
}
