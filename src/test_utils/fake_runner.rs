//! Scriptable [`CommandRunner`] for tests
//!
//! Responses are queued in call order; every invocation is recorded so tests
//! can assert on the exact command line. Once the queue is empty the fake
//! answers with empty successful output.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::runner::{CommandOutput, CommandRunner, RunError};

/// One recorded call to [`FakeCommandRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name
    pub command: String,
    /// Arguments in order
    pub args: Vec<String>,
}

impl Invocation {
    /// Returns the value following `flag`, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Test double for [`CommandRunner`].
#[derive(Debug, Default)]
pub struct FakeCommandRunner {
    responses: Mutex<VecDeque<Result<CommandOutput, RunError>>>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeCommandRunner {
    /// Creates a fake with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response with the given stdout.
    pub fn push_stdout(&self, stdout: impl Into<String>) -> &Self {
        self.push(Ok(CommandOutput {
            stdout: stdout.into(),
            stderr: String::new(),
        }))
    }

    /// Queues a failed response with the given exit reason and stderr.
    pub fn push_failure(&self, reason: impl Into<String>, stderr: impl Into<String>) -> &Self {
        self.push(Err(RunError {
            command: String::new(),
            reason: reason.into(),
            stdout: String::new(),
            stderr: stderr.into(),
        }))
    }

    /// Queues an arbitrary response.
    pub fn push(&self, response: Result<CommandOutput, RunError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// All invocations so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run(&self, command: &str, args: &[String]) -> Result<CommandOutput, RunError> {
        self.calls.lock().unwrap().push(Invocation {
            command: command.to_string(),
            args: args.to_vec(),
        });

        match self.responses.lock().unwrap().pop_front() {
            Some(Err(mut err)) => {
                err.command = command.to_string();
                Err(err)
            }
            Some(ok) => ok,
            None => Ok(CommandOutput::default()),
        }
    }
}
