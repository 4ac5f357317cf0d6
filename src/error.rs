//! Error types for aesdiag operations.
//!
//! This module defines [`AesDiagError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Checkers turn evidence-collection failures into report text and keep going
//! - Only sink failures and interrupted subprocess waits escape a checker
//! - `main` is the single place that maps an error to an exit status

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for aesdiag operations.
#[derive(Debug, Error)]
pub enum AesDiagError {
    /// The report file could not be opened for appending.
    #[error("Cannot open report file {path}: {source}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the report failed.
    #[error("Failed to write report: {0}")]
    ReportWrite(#[source] std::io::Error),

    /// An external command could not be started.
    #[error("Failed to run '{command}': {message}")]
    CommandFailed { command: String, message: String },

    /// A blocking wait on an external command was interrupted.
    #[error("Interrupted while waiting for '{command}'")]
    Interrupted { command: String },

    /// The tool configuration file is invalid.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A security provider line did not have the expected shape.
    #[error("Malformed provider line '{line}': {message}")]
    ProviderLine { line: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AesDiagError {
    /// Whether this error must stop the whole pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::OutputOpen { .. }
                | Self::ReportWrite(_)
                | Self::Interrupted { .. }
                | Self::ConfigParse { .. }
                | Self::Other(_)
        )
    }
}

/// Result type alias for aesdiag operations.
pub type Result<T> = std::result::Result<T, AesDiagError>;
