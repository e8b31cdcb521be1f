//! FixGenerator trait.

use crate::issues::Issue;

use super::types::Fix;

/// Proposes a patch for issues of the categories it claims.
pub trait FixGenerator: Send + Sync {
    fn id(&self) -> &str;

    /// Claim an issue. Only the first claiming generator is asked to
    /// generate.
    fn can_fix(&self, issue: &Issue) -> bool;

    /// Claim an issue with the unit's lines in view. Defaults to
    /// [`Self::can_fix`]; generators whose claim depends on surrounding
    /// code override it.
    fn claims(&self, issue: &Issue, _lines: &[String]) -> bool {
        self.can_fix(issue)
    }

    /// `None` declines the claimed issue.
    fn generate(&self, issue: &Issue, lines: &[String]) -> Option<Fix>;
}
