//! Fix generator confidences and templates.
//!
//! The confidence values are informally calibrated defaults, not derived
//! from any model. All of them are overridable.

use serde::{Deserialize, Serialize};

/// Configuration for the fix generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixerConfig {
    /// `elif` / `else if` rewritten to a plain `if`.
    pub elif_to_if_confidence: f64,
    /// Orphaned `else` with an empty or trivial body deleted.
    pub delete_trivial_else_confidence: f64,
    /// Orphaned `else` with a real body (manual only).
    pub nontrivial_else_confidence: f64,
    /// Pending-order field initialization inserted.
    pub field_init_confidence: f64,
    /// Undefined variable (manual only).
    pub undefined_variable_confidence: f64,
    /// Callback code commented out of the wrong method.
    pub callback_relocation_confidence: f64,
    /// Misaligned branch header re-indented.
    pub indentation_realign_confidence: f64,
    /// Pending-order guard inserted at the top of the step hook.
    pub guard_insert_confidence: f64,
    /// Generators never emit AUTO below this confidence.
    pub auto_floor: f64,
    /// Statements inserted into the initializer. `{field}` expands to the
    /// pending-order field name.
    pub field_init_statements: Vec<String>,
    /// Generator ids to skip.
    pub disabled_generators: Vec<String>,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            elif_to_if_confidence: 0.85,
            delete_trivial_else_confidence: 0.90,
            nontrivial_else_confidence: 0.30,
            field_init_confidence: 0.95,
            undefined_variable_confidence: 0.50,
            callback_relocation_confidence: 0.75,
            indentation_realign_confidence: 0.60,
            guard_insert_confidence: 0.70,
            auto_floor: 0.80,
            field_init_statements: vec![
                "self.{field} = None".to_string(),
                "self.buyprice = None".to_string(),
            ],
            disabled_generators: Vec::new(),
        }
    }
}

impl FixerConfig {
    /// Every confidence knob with its field name, for validation.
    pub fn confidences(&self) -> [(&'static str, f64); 9] {
        [
            ("elif_to_if_confidence", self.elif_to_if_confidence),
            ("delete_trivial_else_confidence", self.delete_trivial_else_confidence),
            ("nontrivial_else_confidence", self.nontrivial_else_confidence),
            ("field_init_confidence", self.field_init_confidence),
            ("undefined_variable_confidence", self.undefined_variable_confidence),
            ("callback_relocation_confidence", self.callback_relocation_confidence),
            ("indentation_realign_confidence", self.indentation_realign_confidence),
            ("guard_insert_confidence", self.guard_insert_confidence),
            ("auto_floor", self.auto_floor),
        ]
    }

    /// Initialization statements with `{field}` expanded.
    pub fn expanded_field_init(&self, field: &str) -> Vec<String> {
        self.field_init_statements
            .iter()
            .map(|s| s.replace("{field}", field))
            .collect()
    }
}
