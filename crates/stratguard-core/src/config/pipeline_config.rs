//! Pipeline caller parameters.

use serde::{Deserialize, Serialize};

use crate::types::severity::Severity;

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// AUTO fixes at or above this confidence are applied.
    pub confidence_threshold: f64,
    /// Apply eligible fixes (otherwise only propose them).
    pub auto_apply: bool,
    /// Run the Execute stage (requires a runner).
    pub execute: bool,
    /// Run text-level detection and fixing on units that fail to parse.
    pub recover_syntax_errors: bool,
    /// Remaining issues below this severity do not fail a unit.
    pub blocking_severity: Severity,
    /// Process batch units on the rayon pool.
    pub parallel: bool,
    /// Write `<stem>.fixed.<ext>` next to sources that changed (CLI only).
    pub write_fixed: bool,
    /// Parse cache capacity (0 disables the cache).
    pub parse_cache_capacity: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.80,
            auto_apply: true,
            execute: false,
            recover_syntax_errors: false,
            blocking_severity: Severity::Low,
            parallel: false,
            write_fixed: false,
            parse_cache_capacity: 1_024,
        }
    }
}
