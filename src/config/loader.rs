//! Configuration loading.
//!
//! Precedence, highest first: CLI flag, config file, environment, default.

use crate::config::schema::DiagnosticConfig;
use crate::error::{AesDiagError, Result};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the Java runtime root.
pub const JAVA_HOME_VAR: &str = "JAVA_HOME";

/// Parse configuration from YAML text.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, path: &Path) -> Result<DiagnosticConfig> {
    if content.trim().is_empty() {
        return Ok(DiagnosticConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| AesDiagError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load configuration from `path`, or the defaults when no path is given.
///
/// A file that cannot be read is [`AesDiagError::Other`]; a file that
/// cannot be parsed is [`AesDiagError::ConfigParse`].
pub fn load_config(path: Option<&Path>) -> Result<DiagnosticConfig> {
    let Some(path) = path else {
        return Ok(DiagnosticConfig::default());
    };

    tracing::debug!("Loading config from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&content, path)
}

impl DiagnosticConfig {
    /// Apply the CLI `--java-home` override and fall back to `JAVA_HOME`.
    pub fn resolve_java_home<F>(mut self, cli_override: Option<PathBuf>, env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        self.java_home = cli_override.or(self.java_home).or_else(|| {
            env_fn(JAVA_HOME_VAR)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        });
        self
    }
}
