//! Append-only report writer shared by all checkers.
//!
//! The report is flat UTF-8 text. Captured evidence is bracketed by
//! `[[Start <label>]]` / `[[End <label>]]` lines and verdicts are written
//! as `[[<description>: <value>]]` summary lines.

use std::fmt::Display;
use std::io::Write;

use crate::error::{AesDiagError, Result};

/// Banner appended once before any checker runs.
pub const BANNER: &str = "======================\nAES-NI Support Checker\n======================\n";

/// Append-only text sink.
///
/// Every write is forwarded to the underlying writer immediately; nothing
/// is ever read back.
pub struct ReportSink<'a> {
    out: &'a mut dyn Write,
}

impl<'a> ReportSink<'a> {
    /// Wrap a writer.
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    /// Append raw text.
    pub fn append(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .map_err(AesDiagError::ReportWrite)
    }

    /// Append `text` followed by a newline.
    pub fn line(&mut self, text: &str) -> Result<()> {
        self.append(text)?;
        self.append("\n")
    }

    /// Append an empty line.
    pub fn blank(&mut self) -> Result<()> {
        self.append("\n")
    }

    /// Append a `[[<label>]]` line.
    pub fn marker(&mut self, label: &str) -> Result<()> {
        self.line(&format!("[[{}]]", label))
    }

    /// Append a `[[Start <label>]]` line.
    pub fn start(&mut self, label: &str) -> Result<()> {
        self.marker(&format!("Start {}", label))
    }

    /// Append an `[[End <label>]]` line.
    pub fn end(&mut self, label: &str) -> Result<()> {
        self.marker(&format!("End {}", label))
    }

    /// Append a `[[<description>: <value>]]` summary line.
    pub fn summary(&mut self, description: &str, value: impl Display) -> Result<()> {
        self.marker(&format!("{}: {}", description, value))
    }

    /// Append captured text verbatim, terminating the last line if needed.
    ///
    /// Line endings inside `text` (including `\r`) are kept as they are.
    pub fn echo(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.append(text)?;
        if !text.ends_with('\n') {
            self.blank()?;
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(AesDiagError::ReportWrite)
    }
}
