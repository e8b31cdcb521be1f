use std::sync::LazyLock;

use aho_corasick::AhoCorasick;

use stratguard_core::config::FixerConfig;

use crate::fixes::traits::FixGenerator;
use crate::fixes::types::{Fix, FixType};
use crate::issues::Issue;
use crate::lines::{block_end, is_blank, leading_whitespace};

use super::{enclosing_def_name, span};

pub const RELOCATION_MARKER: &str = "# [stratguard] belongs in notify_order:";

/// Field accesses that only make sense inside an order/trade notification.
const CALLBACK_FIELDS: &[&str] = &[
    "order.status",
    "order.executed",
    "order.isbuy",
    "order.issell",
    "order.Completed",
    "order.Canceled",
    "order.Margin",
    "order.Rejected",
    "order.Submitted",
    "order.Accepted",
    "trade.pnl",
    "trade.pnlcomm",
    "trade.isclosed",
];

static CALLBACK_MATCHER: LazyLock<Option<AhoCorasick>> =
    LazyLock::new(|| AhoCorasick::new(CALLBACK_FIELDS).ok());

fn mentions_callback_field(text: &str) -> bool {
    CALLBACK_MATCHER
        .as_ref()
        .is_some_and(|matcher| matcher.is_match(text))
}

/// A detached branch that reads notification fields outside a `notify_*`
/// method is commented out with a marker instead of being rewritten.
pub struct CallbackRelocationFixer {
    confidence: f64,
    auto_floor: f64,
}

impl CallbackRelocationFixer {
    pub fn new(config: &FixerConfig) -> Self {
        Self {
            confidence: config.callback_relocation_confidence,
            auto_floor: config.auto_floor,
        }
    }
}

impl FixGenerator for CallbackRelocationFixer {
    fn id(&self) -> &str {
        "callback-relocation"
    }

    fn can_fix(&self, issue: &Issue) -> bool {
        issue.category.is_branch_defect()
            && issue.snippet.as_deref().is_some_and(mentions_callback_field)
    }

    fn claims(&self, issue: &Issue, lines: &[String]) -> bool {
        if !issue.category.is_branch_defect() {
            return false;
        }
        let idx = issue.line_index();
        if idx >= lines.len() {
            return false;
        }
        // Already inside a callback: the branch is misplaced, not misfiled.
        if enclosing_def_name(lines, idx).is_some_and(|name| name.starts_with("notify_")) {
            return false;
        }
        let end = block_end(lines, idx);
        lines[idx..=end].iter().any(|l| mentions_callback_field(l))
    }

    fn generate(&self, issue: &Issue, lines: &[String]) -> Option<Fix> {
        let idx = issue.line_index();
        let header = lines.get(idx)?;
        let end = block_end(lines, idx);

        let mut commented = Vec::with_capacity(end - idx + 1);
        commented.push(format!(
            "{}{} {}",
            leading_whitespace(header),
            RELOCATION_MARKER,
            header.trim_start()
        ));
        for line in &lines[idx + 1..=end] {
            if is_blank(line) {
                commented.push(line.clone());
            } else {
                commented.push(format!("{}# {}", leading_whitespace(line), line.trim_start()));
            }
        }

        Some(
            Fix::replace(issue, issue.line, end as u32 + 1, &span(lines, idx, end), &commented)
                .classified(FixType::SemiAuto, self.confidence, self.auto_floor)
                .explained("order/trade callback logic found outside notify_order; commented out for relocation"),
        )
    }
}
