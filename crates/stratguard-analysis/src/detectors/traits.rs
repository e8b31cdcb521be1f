//! Detector trait.

use crate::issues::{Issue, IssueCategory};

use super::context::DetectionContext;

/// What a detector needs from the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionMode {
    /// Needs a valid syntax tree; yields nothing without one.
    Tree,
    /// Works on raw lines; runs even when the tree is absent.
    Text,
}

/// A pure analyzer over one unit. Must not mutate its input.
pub trait Detector: Send + Sync {
    /// Unique identifier, used to enable/disable the detector.
    fn id(&self) -> &str;

    /// The category this detector reports.
    fn category(&self) -> IssueCategory;

    fn mode(&self) -> DetectionMode;

    fn detect(&self, ctx: &DetectionContext) -> Vec<Issue>;
}
