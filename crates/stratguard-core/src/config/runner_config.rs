//! Execute-stage runner settings.

use serde::{Deserialize, Serialize};

/// Configuration for the sandboxed candidate runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Interpreter command; the candidate code is piped to its stdin.
    pub command: Vec<String>,
    /// Hard wall-clock limit per candidate.
    pub timeout_ms: u64,
    /// Virtual memory cap applied via `ulimit -v` (unix only).
    pub memory_limit_mb: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: vec!["python3".to_string(), "-".to_string()],
            timeout_ms: 30_000,
            memory_limit_mb: Some(1_024),
        }
    }
}
