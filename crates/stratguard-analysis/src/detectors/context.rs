//! Context handed to every detector.

use tree_sitter::Tree;

use stratguard_core::config::ValidatorConfig;

use crate::parsers::SourceUnit;

/// Read-only view of one unit plus the validator configuration.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    pub unit: &'a SourceUnit,
    pub config: &'a ValidatorConfig,
}

impl<'a> DetectionContext<'a> {
    pub fn new(unit: &'a SourceUnit, config: &'a ValidatorConfig) -> Self {
        Self { unit, config }
    }

    pub fn tree(&self) -> Option<&'a Tree> {
        self.unit.tree()
    }

    pub fn lines(&self) -> &'a [String] {
        self.unit.lines()
    }

    pub fn source(&self) -> &'a [u8] {
        self.unit.source()
    }

    /// Trimmed text of a 0-based row, for issue snippets.
    pub fn snippet(&self, row: usize) -> Option<String> {
        self.lines().get(row).map(|l| l.trim().to_string())
    }
}
