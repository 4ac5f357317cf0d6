//! Evidence checkers.
//!
//! Each checker implements the [`Checker`] trait: it appends everything it
//! examines to the shared [`ReportSink`] and returns its verdicts. Soft
//! failures (missing files, commands that cannot start, malformed lines)
//! become report text; only report write failures and interrupted waits
//! are returned as errors.

pub mod library;
pub mod os;
pub mod runtime;

pub use library::CryptoLibraryChecker;
pub use os::OsSignalChecker;
pub use runtime::{process_environment, RuntimeEnvironmentChecker};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::DiagnosticConfig;
use crate::error::{AesDiagError, Result};
use crate::report::ReportSink;
use crate::security::find_security_file;
use crate::shell::{CommandOutput, CommandRunner};

/// Trait for checker implementations.
pub trait Checker {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Append findings to `sink` and return the verdicts reached.
    fn check(&self, sink: &mut ReportSink<'_>) -> Result<Vec<Verdict>>;
}

/// A single boolean finding shown on the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub description: String,
    pub value: bool,
}

impl Verdict {
    pub fn new(description: impl Into<String>, value: bool) -> Self {
        Self {
            description: description.into(),
            value,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, self.value)
    }
}

/// Read a text file, replacing invalid UTF-8.
pub(crate) fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run a command, writing start failures and positive exit codes to `sink`.
///
/// Returns `None` when the command could not be started. The caller decides
/// which output streams to echo.
pub(crate) fn run_logged(
    runner: &dyn CommandRunner,
    sink: &mut ReportSink<'_>,
    tool: &str,
    program: &str,
    args: &[&str],
) -> Result<Option<CommandOutput>> {
    tracing::debug!("Running {} {}", program, args.join(" "));
    match runner.run(program, args) {
        Ok(output) => {
            if let Some(note) = output.exit_note(tool) {
                tracing::warn!("{}", note);
                sink.line(&note)?;
            }
            Ok(Some(output))
        }
        Err(e @ AesDiagError::Interrupted { .. }) => Err(e),
        Err(e) => {
            tracing::warn!("Error running {}: {}", tool, e);
            sink.line(&format!("Error running {}:", tool))?;
            sink.line(&e.to_string())?;
            Ok(None)
        }
    }
}

/// Find the security configuration file, or explain why it is unavailable.
pub(crate) fn locate_security_file(
    config: &DiagnosticConfig,
) -> std::result::Result<PathBuf, String> {
    let name = &config.security_file_name;
    let Some(java_home) = config.java_home.as_deref() else {
        return Err(format!("Couldn't find {} file: no Java home configured", name));
    };

    match find_security_file(java_home, name, config.search_depth) {
        Ok(Some(path)) => Ok(path),
        Ok(None) => Err(format!("Couldn't find {} file", name)),
        Err(e) => Err(format!("Error finding {} file\n{}", name, e)),
    }
}
