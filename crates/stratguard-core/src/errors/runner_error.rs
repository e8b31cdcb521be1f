//! Execute-stage failures. Always converted into result fields by the pipeline.

use super::error_code::{self, StratguardErrorCode};

#[derive(Debug, Clone, thiserror::Error)]
pub enum RunnerError {
    #[error("execution exceeded {limit_ms}ms wall-clock limit")]
    Timeout { limit_ms: u64 },

    #[error("candidate raised: {message}")]
    Exception { message: String },

    #[error("failed to start runner: {message}")]
    Spawn { message: String },
}

impl StratguardErrorCode for RunnerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => error_code::RUNTIME_TIMEOUT,
            Self::Exception { .. } => error_code::RUNTIME_EXCEPTION,
            Self::Spawn { .. } => error_code::RUNNER_SPAWN_FAILED,
        }
    }
}
