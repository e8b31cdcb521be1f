//! Stable, machine-readable error codes.

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_INVALID_VALUE: &str = "CONFIG_INVALID_VALUE";
pub const GRAMMAR_LOAD_FAILED: &str = "GRAMMAR_LOAD_FAILED";
pub const PARSER_FAILED: &str = "PARSER_FAILED";
pub const INPUT_UNREADABLE: &str = "INPUT_UNREADABLE";
pub const OUTPUT_WRITE_FAILED: &str = "OUTPUT_WRITE_FAILED";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const RUNTIME_TIMEOUT: &str = "RUNTIME_TIMEOUT";
pub const RUNTIME_EXCEPTION: &str = "RUNTIME_EXCEPTION";
pub const RUNNER_SPAWN_FAILED: &str = "RUNNER_SPAWN_FAILED";

/// Every error enum in the workspace maps its variants to a stable code.
pub trait StratguardErrorCode {
    fn error_code(&self) -> &'static str;
}
