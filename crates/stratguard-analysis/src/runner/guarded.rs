//! Hard wall-clock limit around any in-process runner.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};

use stratguard_core::errors::RunnerError;

use super::traits::{CodeRunner, RunOutcome};

/// Runs the inner runner on a worker thread and gives up after `timeout`.
/// A timed-out worker is abandoned, not killed; use [`super::ProcessRunner`]
/// when the candidate must actually be stopped.
pub struct GuardedRunner<R> {
    inner: Arc<R>,
    timeout: Duration,
}

impl<R: CodeRunner + 'static> GuardedRunner<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }
}

impl<R: CodeRunner + 'static> CodeRunner for GuardedRunner<R> {
    fn run(&self, code: &str) -> RunOutcome {
        let (tx, rx) = bounded(1);
        let inner = Arc::clone(&self.inner);
        let code = code.to_string();

        let spawned = thread::Builder::new()
            .name("stratguard-runner".to_string())
            .spawn(move || {
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| inner.run(&code)))
                    .unwrap_or_else(|payload| {
                        RunnerError::Exception {
                            message: panic_message(payload.as_ref()),
                        }
                        .into()
                    });
                let _ = tx.send(outcome);
            });
        if let Err(e) = spawned {
            return RunnerError::Spawn {
                message: e.to_string(),
            }
            .into();
        }

        match rx.recv_timeout(self.timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(limit_ms = self.timeout.as_millis() as u64, "candidate timed out");
                RunnerError::Timeout {
                    limit_ms: self.timeout.as_millis() as u64,
                }
                .into()
            }
            Err(RecvTimeoutError::Disconnected) => RunnerError::Exception {
                message: "runner thread exited without a result".to_string(),
            }
            .into(),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "runner panicked".to_string()
    }
}
