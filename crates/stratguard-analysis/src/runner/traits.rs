//! The narrow `run(code) -> outcome` contract.

use serde::{Deserialize, Serialize};

use stratguard_core::errors::RunnerError;

/// Why a run failed. Never a defect; always a result field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    RuntimeException,
    RuntimeTimeout,
    SpawnFailure,
}

impl FailureKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RuntimeException => "runtime-exception",
            Self::RuntimeTimeout => "runtime-timeout",
            Self::SpawnFailure => "spawn-failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RunOutcome {
    Success { metrics: serde_json::Value },
    Failure { kind: FailureKind, message: String },
}

impl From<RunnerError> for RunOutcome {
    fn from(err: RunnerError) -> Self {
        let kind = match &err {
            RunnerError::Timeout { .. } => FailureKind::RuntimeTimeout,
            RunnerError::Exception { .. } => FailureKind::RuntimeException,
            RunnerError::Spawn { .. } => FailureKind::SpawnFailure,
        };
        Self::Failure {
            kind,
            message: err.to_string(),
        }
    }
}

/// Runs candidate code against synthetic input.
pub trait CodeRunner: Send + Sync {
    fn run(&self, code: &str) -> RunOutcome;
}

impl<F> CodeRunner for F
where
    F: Fn(&str) -> RunOutcome + Send + Sync,
{
    fn run(&self, code: &str) -> RunOutcome {
        self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_error_maps_to_failure_kind() {
        let outcome: RunOutcome = RunnerError::Timeout { limit_ms: 10 }.into();
        assert!(matches!(
            outcome,
            RunOutcome::Failure { kind: FailureKind::RuntimeTimeout, .. }
        ));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = RunOutcome::Failure {
            kind: FailureKind::RuntimeException,
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "runtime-exception");
    }
}
