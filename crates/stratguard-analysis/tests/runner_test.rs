//! Execute-stage runner tests: timeouts, panics and the subprocess runner.

use std::thread;
use std::time::{Duration, Instant};

use stratguard_analysis::runner::{CodeRunner, FailureKind, GuardedRunner, ProcessRunner, RunOutcome};
use stratguard_core::config::RunnerConfig;

fn failure_kind(outcome: &RunOutcome) -> Option<FailureKind> {
    match outcome {
        RunOutcome::Failure { kind, .. } => Some(*kind),
        RunOutcome::Success { .. } => None,
    }
}

// ---- GuardedRunner ----

#[test]
fn guarded_runner_passes_success_through() {
    let runner = GuardedRunner::new(
        |code: &str| RunOutcome::Success {
            metrics: serde_json::json!({ "len": code.len() }),
        },
        Duration::from_secs(5),
    );
    match runner.run("abc") {
        RunOutcome::Success { metrics } => assert_eq!(metrics["len"], 3),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn guarded_runner_times_out() {
    let runner = GuardedRunner::new(
        |_: &str| {
            thread::sleep(Duration::from_secs(2));
            RunOutcome::Success { metrics: serde_json::json!({}) }
        },
        Duration::from_millis(50),
    );
    let started = Instant::now();
    let outcome = runner.run("loop()");
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(failure_kind(&outcome), Some(FailureKind::RuntimeTimeout));
}

#[test]
fn guarded_runner_converts_panics() {
    let runner = GuardedRunner::new(
        |_: &str| -> RunOutcome { panic!("ZeroDivisionError") },
        Duration::from_secs(5),
    );
    let outcome = runner.run("1/0");
    assert_eq!(failure_kind(&outcome), Some(FailureKind::RuntimeException));
    if let RunOutcome::Failure { message, .. } = outcome {
        assert!(message.contains("ZeroDivisionError"));
    }
}

// ---- ProcessRunner ----

#[test]
fn missing_interpreter_is_spawn_failure() {
    let runner = ProcessRunner::new(
        vec!["stratguard-no-such-interpreter".to_string()],
        Duration::from_secs(5),
    );
    assert_eq!(failure_kind(&runner.run("pass")), Some(FailureKind::SpawnFailure));
}

#[cfg(unix)]
fn shell_runner(timeout: Duration) -> ProcessRunner {
    ProcessRunner::new(vec!["sh".to_string()], timeout)
}

#[cfg(unix)]
#[test]
fn process_runner_reads_metrics_from_last_line() {
    let outcome = shell_runner(Duration::from_secs(10)).run("echo warming up\necho '{\"trades\": 4}'\n");
    match outcome {
        RunOutcome::Success { metrics } => assert_eq!(metrics["trades"], 4),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn process_runner_reports_last_stderr_line() {
    let outcome = shell_runner(Duration::from_secs(10)).run("echo trace >&2\necho 'ValueError: bad bar' >&2\nexit 3\n");
    match outcome {
        RunOutcome::Failure { kind, message } => {
            assert_eq!(kind, FailureKind::RuntimeException);
            assert!(message.contains("ValueError: bad bar"), "{message}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn process_runner_kills_on_timeout() {
    let started = Instant::now();
    let outcome = shell_runner(Duration::from_millis(200)).run("exec sleep 5\n");
    assert_eq!(failure_kind(&outcome), Some(FailureKind::RuntimeTimeout));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[cfg(unix)]
#[test]
fn process_runner_applies_memory_limit_wrapper() {
    let config = RunnerConfig {
        command: vec!["sh".to_string()],
        timeout_ms: 10_000,
        memory_limit_mb: Some(512),
    };
    let outcome = ProcessRunner::from_config(&config).run("echo '{\"ok\": true}'\n");
    match outcome {
        RunOutcome::Success { metrics } => assert_eq!(metrics["ok"], true),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn background_child_holding_pipes_does_not_defeat_timeout() {
    let started = Instant::now();
    let outcome = shell_runner(Duration::from_millis(300)).run("sleep 5 &\nsleep 5\n");
    assert_eq!(failure_kind(&outcome), Some(FailureKind::RuntimeTimeout));
    assert!(started.elapsed() < Duration::from_secs(4));
}
