//! Error types for every stratguard subsystem.
//!
//! Issues, fix-generation failures and fix conflicts are data, not errors.
//! The enums here cover infrastructure failures only.

pub mod error_code;

mod config_error;
mod parse_error;
mod pipeline_error;
mod runner_error;

pub use config_error::ConfigError;
pub use parse_error::ParseError;
pub use pipeline_error::{PipelineError, PipelineResultExt, StratguardResult};
pub use runner_error::RunnerError;
