//! NSS library descriptor files referenced by PKCS#11 provider lines.
//!
//! A descriptor is a small `key = value` file. Only `name` and
//! `nssLibraryDirectory` are interpreted; everything is kept verbatim for
//! the report.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{AesDiagError, Result};
use crate::shell::CommandRunner;

/// A parsed NSS descriptor and the result of checking its library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Path the descriptor was read from.
    pub source_path: PathBuf,

    /// Value of the `name` line.
    pub declared_name: Option<String>,

    /// Value of the `nssLibraryDirectory` line.
    pub library_directory: Option<String>,

    /// Full descriptor text.
    pub raw_contents: String,

    /// `ldd` output for the library, or why it was not available.
    pub resolution_detail: String,

    /// Directory and library both exist and are readable, and `ldd` ran.
    pub is_installed: bool,
}

/// Value of a `key = value` line, trimmed, if the line declares `key`.
fn field_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?;
    let (gap, value) = rest.split_once('=')?;
    gap.trim().is_empty().then(|| value.trim())
}

/// Outcome of checking a library directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Installation {
    installed: bool,
    detail: String,
}

impl Installation {
    fn missing(detail: String) -> Self {
        Self {
            installed: false,
            detail,
        }
    }
}

impl LibraryConfig {
    /// Read and evaluate the descriptor at `path`.
    ///
    /// Failing to read the descriptor is returned as an error. Failures while
    /// checking the library it names become the resolution detail.
    pub fn load(path: &Path, library_file_name: &str, runner: &dyn CommandRunner) -> Result<Self> {
        tracing::debug!("Reading NSS descriptor {}", path.display());
        let bytes = fs::read(path)?;
        let contents = String::from_utf8_lossy(&bytes).into_owned();
        Self::from_contents(path, contents, library_file_name, runner)
    }

    /// Evaluate descriptor text that has already been read.
    pub fn from_contents(
        path: &Path,
        contents: String,
        library_file_name: &str,
        runner: &dyn CommandRunner,
    ) -> Result<Self> {
        let mut declared_name = None;
        let mut library_directory = None;

        for line in contents.lines() {
            if let Some(value) = field_value(line, "name") {
                declared_name = Some(value.to_string());
            }
            if let Some(value) = field_value(line, "nssLibraryDirectory") {
                library_directory = Some(value.to_string());
            }
        }

        let installation = match library_directory.as_deref() {
            Some(dir) if !dir.trim().is_empty() => {
                check_installation(Path::new(dir), library_file_name, runner)?
            }
            _ => Installation::missing(String::new()),
        };

        Ok(Self {
            source_path: path.to_path_buf(),
            declared_name,
            library_directory,
            raw_contents: contents,
            resolution_detail: installation.detail,
            is_installed: installation.installed,
        })
    }
}

/// Check the library directory in order, stopping at the first failure.
///
/// Only an interrupted `ldd` wait is returned as an error.
fn check_installation(
    dir: &Path,
    library_file_name: &str,
    runner: &dyn CommandRunner,
) -> Result<Installation> {
    if !dir.exists() {
        return Ok(Installation::missing(format!(
            "{} does not exist",
            dir.display()
        )));
    }

    if fs::read_dir(dir).is_err() {
        return Ok(Installation::missing(format!("Can't read: {}", dir.display())));
    }

    let library = dir.join(library_file_name);
    if !library.is_file() {
        return Ok(Installation::missing(format!(
            "{} does not exist",
            library.display()
        )));
    }

    if File::open(&library).is_err() {
        return Ok(Installation::missing(format!(
            "Can't read: {}",
            library.display()
        )));
    }

    let library_arg = library.to_string_lossy();
    match runner.run("ldd", &[library_arg.as_ref()]) {
        Ok(output) => {
            let mut detail = String::new();
            if let Some(note) = output.exit_note("ldd") {
                detail.push_str(&note);
                detail.push('\n');
            }
            detail.push_str(&output.stdout);
            if !detail.is_empty() && !detail.ends_with('\n') {
                detail.push('\n');
            }
            Ok(Installation {
                installed: true,
                detail,
            })
        }
        Err(e @ AesDiagError::Interrupted { .. }) => Err(e),
        Err(e) => {
            tracing::warn!("ldd failed for {}: {}", library.display(), e);
            Ok(Installation::missing(format!("Error running ldd:\n{}\n", e)))
        }
    }
}
