//! Mock command runner for testing.
//!
//! `MockRunner` implements the [`CommandRunner`] trait and answers with
//! pre-configured outputs keyed by the full command line. Every invocation
//! is recorded for later assertion.
//!
//! # Example
//!
//! ```
//! use aesdiag::shell::{CommandOutput, CommandRunner, MockRunner};
//!
//! let runner = MockRunner::new().with_output("uname -a", CommandOutput::success("Linux\n"));
//!
//! let output = runner.run("uname", &["-a"]).unwrap();
//! assert_eq!(output.stdout, "Linux\n");
//! assert_eq!(runner.calls(), vec!["uname -a".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{AesDiagError, Result};

use super::command::{display_command, CommandOutput, CommandRunner};

#[derive(Debug, Clone)]
enum MockResponse {
    Output(CommandOutput),
    StartFailure(String),
    Interrupted,
}

/// Command runner that returns canned responses.
///
/// Commands with no configured response fail to start, the same way a
/// missing binary does.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, MockResponse>,
    calls: RefCell<Vec<String>>,
}

impl MockRunner {
    /// Create a runner with no configured commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `output`.
    pub fn with_output(mut self, command: &str, output: CommandOutput) -> Self {
        self.responses
            .insert(command.to_string(), MockResponse::Output(output));
        self
    }

    /// Make `command` fail to start with `message`.
    pub fn with_start_failure(mut self, command: &str, message: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            MockResponse::StartFailure(message.to_string()),
        );
        self
    }

    /// Make the wait on `command` report an interruption.
    pub fn with_interruption(mut self, command: &str) -> Self {
        self.responses
            .insert(command.to_string(), MockResponse::Interrupted);
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let command = display_command(program, args);
        self.calls.borrow_mut().push(command.clone());

        match self.responses.get(&command) {
            Some(MockResponse::Output(output)) => Ok(output.clone()),
            Some(MockResponse::StartFailure(message)) => Err(AesDiagError::CommandFailed {
                command,
                message: message.clone(),
            }),
            Some(MockResponse::Interrupted) => Err(AesDiagError::Interrupted { command }),
            None => Err(AesDiagError::CommandFailed {
                command,
                message: "No such file or directory (os error 2)".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_fails_to_start() {
        let runner = MockRunner::new();
        let err = runner.run("lscpu", &[]).unwrap_err();
        assert!(matches!(err, AesDiagError::CommandFailed { .. }));
        assert_eq!(runner.calls(), vec!["lscpu".to_string()]);
    }

    #[test]
    fn interruption_is_reported() {
        let runner = MockRunner::new().with_interruption("ldd /lib/libnss3.so");
        let err = runner.run("ldd", &["/lib/libnss3.so"]).unwrap_err();
        assert!(matches!(err, AesDiagError::Interrupted { .. }));
    }

    #[test]
    fn start_failure_carries_message() {
        let runner = MockRunner::new().with_start_failure("dpkg -s libnss3", "permission denied");
        let err = runner.run("dpkg", &["-s", "libnss3"]).unwrap_err();
        assert!(err.to_string().contains("permission denied"));
    }
}
