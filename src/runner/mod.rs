//! External command execution
//!
//! Every call tile-harness makes to `om` or `bosh` goes through the
//! [`CommandRunner`] trait so tests can substitute a fake (see
//! `test_utils::FakeCommandRunner`). [`Executor`] is the process-backed
//! implementation used outside of tests.
//!
//! Calls are blocking and sequential. There is no timeout or retry; the child
//! process is waited on and its pipes are closed before [`Executor::run`]
//! returns, on every path.

use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

/// Arguments longer than this are elided from log lines.
const MAX_LOGGED_ARG_LEN: usize = 64;

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

/// A command that could not be spawned or exited unsuccessfully.
///
/// The captured streams are kept so callers can embed `stderr` in their own
/// error messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct RunError {
    /// Program name as requested by the caller
    pub command: String,
    /// Exit status or spawn failure description
    pub reason: String,
    /// Standard output captured before failure
    pub stdout: String,
    /// Standard error captured before failure
    pub stderr: String,
}

impl RunError {
    /// A failure that happened before the process produced any output.
    pub fn spawn(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            reason: reason.into(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Runs an external command and captures its output.
///
/// Mirrors `run(command, args...) -> (stdout, stderr, error)`: on failure the
/// [`RunError`] still carries whatever the process wrote.
pub trait CommandRunner {
    /// Runs `command` with `args`, blocking until it exits.
    fn run(&self, command: &str, args: &[String]) -> Result<CommandOutput, RunError>;
}

/// Runner shared between a product service and the manifests it renders.
pub type SharedRunner = Arc<dyn CommandRunner + Send + Sync>;

/// Process-backed [`CommandRunner`].
///
/// Resolves the program on `PATH` with `which` so a missing binary produces a
/// clear message instead of a bare `ENOENT`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Executor;

impl Executor {
    /// Creates a new executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Convenience for the common case of sharing one executor.
    #[must_use]
    pub fn shared() -> SharedRunner {
        Arc::new(Self)
    }
}

impl CommandRunner for Executor {
    fn run(&self, command: &str, args: &[String]) -> Result<CommandOutput, RunError> {
        let program = which::which(command)
            .map_err(|e| RunError::spawn(command, format!("{command} not found on PATH: {e}")))?;

        let command_line = loggable_command(command, args);
        tracing::debug!(target: "runner", "Executing command: {}", command_line);

        let start = Instant::now();
        let output = Command::new(&program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| RunError::spawn(command, format!("failed to execute {command}: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "runner::perf", "{} took {:.2}s", command_line, elapsed.as_secs_f64());
        } else {
            tracing::debug!(target: "runner::perf", "{} took {}ms", command_line, elapsed.as_millis());
        }

        if !output.status.success() {
            tracing::debug!(
                target: "runner",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "runner", "Error: {}", stderr.trim());
            }
            return Err(RunError {
                command: command.to_string(),
                reason: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        Ok(CommandOutput {
            stdout,
            stderr,
        })
    }
}

/// Formats a command for logging, eliding long arguments such as inline JSON.
pub(crate) fn loggable_command(command: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(command.to_string());
    for arg in args {
        if arg.len() > MAX_LOGGED_ARG_LEN {
            parts.push(format!("<{} bytes>", arg.len()));
        } else {
            parts.push(arg.clone());
        }
    }
    parts.join(" ")
}
