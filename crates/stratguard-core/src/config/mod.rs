pub mod fixer_config;
pub mod pipeline_config;
pub mod runner_config;
pub mod validator_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use fixer_config::FixerConfig;
pub use pipeline_config::PipelineConfig;
pub use runner_config::RunnerConfig;
pub use validator_config::ValidatorConfig;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StratguardConfig {
    pub validator: ValidatorConfig,
    pub fixer: FixerConfig,
    pub pipeline: PipelineConfig,
    pub runner: RunnerConfig,
}

impl StratguardConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_interval("pipeline.confidence_threshold", self.pipeline.confidence_threshold)?;
        for (field, value) in self.fixer.confidences() {
            check_unit_interval(&format!("fixer.{field}"), value)?;
        }
        if self.validator.branch_scan_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "validator.branch_scan_window".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.validator.pending_order_field.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "validator.pending_order_field".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.runner.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "runner.timeout_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.runner.command.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "runner.command".to_string(),
                message: "must name an interpreter".to_string(),
            });
        }
        Ok(())
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} is outside [0, 1]"),
        })
    }
}
