//! External command execution.
//!
//! Checkers never spawn processes directly. They receive a
//! [`CommandRunner`] so the same code can run against the real system
//! ([`SystemRunner`]) or canned outputs ([`MockRunner`](super::MockRunner)).

use crate::error::{AesDiagError, Result};
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Captured result of an external command that was started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Create an output for a command that exited with status 0.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create an output for a command that exited with the given status.
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with status 0.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The exit code, if it is positive.
    ///
    /// Only positive codes are reported as warnings in the report.
    pub fn failure_code(&self) -> Option<i32> {
        self.exit_code.filter(|code| *code > 0)
    }

    /// The `<tool> exited with code <n>` note for positive exit codes.
    pub fn exit_note(&self, tool: &str) -> Option<String> {
        self.failure_code()
            .map(|code| format!("{} exited with code {}", tool, code))
    }
}

/// Capability to run an external command and capture its output.
pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// Returns [`AesDiagError::CommandFailed`] if the process cannot be
    /// started and [`AesDiagError::Interrupted`] if the wait was
    /// interrupted. A non-zero exit is not an error.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Render a command line for logs and error messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Runs commands as real child processes.
///
/// `Command::output` retries `EINTR` internally, so the interrupted mapping
/// below is only reached if a platform surfaces the error anyway. Tests
/// exercise interruption through [`MockRunner`](super::MockRunner).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let command = display_command(program, args);
        let start = Instant::now();

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::Interrupted => AesDiagError::Interrupted {
                    command: command.clone(),
                },
                _ => AesDiagError::CommandFailed {
                    command: command.clone(),
                    message: e.to_string(),
                },
            })?;

        let duration: Duration = start.elapsed();
        tracing::debug!(
            command = %command,
            code = ?output.status.code(),
            elapsed_ms = duration.as_millis() as u64,
            "Command finished"
        );

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_note_only_for_positive_codes() {
        assert_eq!(CommandOutput::success("ok").exit_note("lscpu"), None);
        assert_eq!(
            CommandOutput::exited(2, "", "").exit_note("lscpu"),
            Some("lscpu exited with code 2".to_string())
        );
        assert_eq!(CommandOutput::exited(-1, "", "").exit_note("lscpu"), None);

        let killed = CommandOutput {
            exit_code: None,
            ..Default::default()
        };
        assert_eq!(killed.exit_note("lscpu"), None);
    }

    #[test]
    fn display_command_joins_args() {
        assert_eq!(display_command("uname", &["-a"]), "uname -a");
        assert_eq!(display_command("lscpu", &[]), "lscpu");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_stdout() {
        let output = SystemRunner.run("echo", &["hello"]).unwrap();
        assert!(output.succeeded());
        assert_eq!(output.stdout, "hello\n");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_keeps_output_of_failing_command() {
        let output = SystemRunner
            .run("sh", &["-c", "echo partial; exit 3"])
            .unwrap();
        assert_eq!(output.failure_code(), Some(3));
        assert_eq!(output.stdout, "partial\n");
    }

    #[test]
    fn system_runner_reports_missing_binary() {
        let err = SystemRunner
            .run("this-command-does-not-exist-12345", &[])
            .unwrap_err();
        assert!(matches!(err, AesDiagError::CommandFailed { .. }));
    }
}
