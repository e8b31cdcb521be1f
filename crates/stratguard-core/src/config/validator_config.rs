//! Detector configuration: what a strategy class must look like.

use serde::{Deserialize, Serialize};

/// Configuration for the validator and its detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Base class names that mark a strategy class. Matched on the last
    /// dotted segment, so `bt.Strategy` matches `Strategy`.
    pub strategy_bases: Vec<String>,
    /// Required initializer method.
    pub initializer: String,
    /// Required per-step update hook.
    pub step_hook: String,
    /// Field tracking the outstanding order (`self.<field>`).
    pub pending_order_field: String,
    /// Maximum non-blank lines scanned backward to match an else/elif.
    pub branch_scan_window: usize,
    /// Extra names treated as always defined.
    pub allowed_names: Vec<String>,
    /// Detector ids to skip.
    pub disabled_detectors: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strategy_bases: vec!["Strategy".to_string()],
            initializer: "__init__".to_string(),
            step_hook: "next".to_string(),
            pending_order_field: "order".to_string(),
            branch_scan_window: 50,
            allowed_names: Vec::new(),
            disabled_detectors: Vec::new(),
        }
    }
}

impl ValidatorConfig {
    /// The exact statement that initializes the pending-order field.
    pub fn pending_field_init(&self) -> String {
        format!("self.{} = None", self.pending_order_field)
    }
}
