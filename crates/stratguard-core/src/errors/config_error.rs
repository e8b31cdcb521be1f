//! Configuration loading and validation errors.

use std::path::PathBuf;

use super::error_code::{self, StratguardErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl StratguardErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => error_code::CONFIG_INVALID_VALUE,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
