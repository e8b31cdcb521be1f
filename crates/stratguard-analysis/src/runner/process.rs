//! ProcessRunner: pipes candidate code into an interpreter subprocess.
//!
//! The child is killed once the wall-clock limit passes. On unix an
//! optional `ulimit -v` caps its address space. A candidate reports metrics
//! by printing a JSON object as its last stdout line.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use stratguard_core::config::RunnerConfig;
use stratguard_core::errors::RunnerError;
use stratguard_core::StratguardErrorCode;

use super::traits::{CodeRunner, RunOutcome};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct ProcessRunner {
    command: Vec<String>,
    timeout: Duration,
    memory_limit_mb: Option<u64>,
}

impl ProcessRunner {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self {
            command,
            timeout,
            memory_limit_mb: None,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            command: config.command.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            memory_limit_mb: config.memory_limit_mb,
        }
    }

    fn build_command(&self) -> Result<Command, RunnerError> {
        let (program, args) = self.command.split_first().ok_or_else(|| RunnerError::Spawn {
            message: "empty runner command".to_string(),
        })?;

        match self.memory_limit_mb {
            Some(limit_mb) if cfg!(unix) => {
                // `$0 "$@"` re-execs the interpreter under the new limit.
                let mut cmd = Command::new("sh");
                cmd.arg("-c")
                    .arg(format!("ulimit -v {} && exec \"$0\" \"$@\"", limit_mb * 1024))
                    .arg(program)
                    .args(args);
                Ok(cmd)
            }
            _ => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                Ok(cmd)
            }
        }
    }

    fn execute(&self, code: &str) -> Result<serde_json::Value, RunnerError> {
        let mut child = self
            .build_command()?
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RunnerError::Spawn {
                message: format!("{}: {e}", self.command.join(" ")),
            })?;

        let writer = child.stdin.take().map(|mut stdin| {
            let code = code.to_string();
            // A candidate may exit before reading all of stdin; the broken
            // pipe is not interesting.
            spawn_named("stratguard-stdin", move || {
                let _ = stdin.write_all(code.as_bytes());
            })
        });
        let stdout = child.stdout.take().map(|out| spawn_named("stratguard-stdout", move || drain(out)));
        let stderr = child.stderr.take().map(|err| spawn_named("stratguard-stderr", move || drain(err)));

        let status = self.wait_with_timeout(&mut child)?;

        if let Some(Ok(handle)) = writer {
            let _ = handle.join();
        }
        let stdout = join_output(stdout);
        let stderr = join_output(stderr);

        if status.success() {
            Ok(parse_metrics(&stdout))
        } else {
            Err(RunnerError::Exception {
                message: failure_message(&stderr, status),
            })
        }
    }

    fn wait_with_timeout(&self, child: &mut Child) -> Result<ExitStatus, RunnerError> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if started.elapsed() >= self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RunnerError::Timeout {
                        limit_ms: self.timeout.as_millis() as u64,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(RunnerError::Exception {
                        message: format!("waiting on child failed: {e}"),
                    });
                }
            }
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::from_config(&RunnerConfig::default())
    }
}

impl CodeRunner for ProcessRunner {
    fn run(&self, code: &str) -> RunOutcome {
        let started = Instant::now();
        match self.execute(code) {
            Ok(metrics) => {
                tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "candidate ran");
                RunOutcome::Success { metrics }
            }
            Err(e) => {
                tracing::debug!(error_code = e.error_code(), error = %e, "candidate failed");
                e.into()
            }
        }
    }
}

fn spawn_named<T, F>(name: &str, f: F) -> std::io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(f)
}

fn drain(stream: impl Read) -> Vec<String> {
    BufReader::new(stream).lines().map_while(Result::ok).collect()
}

fn join_output(handle: Option<std::io::Result<JoinHandle<Vec<String>>>>) -> Vec<String> {
    match handle {
        Some(Ok(handle)) => handle.join().unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// The last non-blank stdout line if it is a JSON object, else `{}`.
fn parse_metrics(stdout: &[String]) -> serde_json::Value {
    stdout
        .iter()
        .rev()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| serde_json::from_str::<serde_json::Value>(line.trim()).ok())
        .filter(serde_json::Value::is_object)
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()))
}

/// The last non-blank stderr line (a traceback's exception line), or the
/// exit status.
fn failure_message(stderr: &[String], status: ExitStatus) -> String {
    stderr
        .iter()
        .rev()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("interpreter exited with {status}"))
}
