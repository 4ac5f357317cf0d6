//! Scanning a security configuration file for an NSS-backed provider.
//!
//! The scan echoes every line into the report and tracks two pieces of
//! state across PKCS#11 provider lines, kept together in [`ScanState`]:
//!
//! - whether the most recent provider line resolved to an installed NSS
//!   library (reset by a provider line without a configuration argument)
//! - the rank of the first provider line whose library was installed
//!
//! NSS counts as configured only if both hold and that rank is 1.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::report::ReportSink;
use crate::shell::CommandRunner;

use super::descriptor::LibraryConfig;
use super::provider::ProviderLine;

/// Placeholder the JDK expands to the runtime root in provider arguments.
const JAVA_HOME_PLACEHOLDER: &str = "${java.home}";

/// State threaded through the line scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    /// The last provider line with a descriptor found its library installed.
    pub current_installed: bool,

    /// Rank of the first provider line whose library was installed.
    pub first_installed_rank: Option<u32>,
}

impl ScanState {
    /// Record the outcome of a provider line with a parsed descriptor.
    pub fn record(&mut self, rank: u32, installed: bool) {
        self.current_installed = installed;
        if installed && self.first_installed_rank.is_none() {
            self.first_installed_rank = Some(rank);
        }
    }

    /// A provider line without a configuration argument was seen.
    pub fn reset(&mut self) {
        self.current_installed = false;
    }

    /// NSS is installed and backs the highest-priority provider.
    pub fn verdict(&self) -> bool {
        self.current_installed && self.first_installed_rank == Some(1)
    }
}

/// Everything learned from one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub state: ScanState,

    /// Descriptors parsed during the scan, in file order.
    pub descriptors: Vec<LibraryConfig>,
}

impl ScanOutcome {
    pub fn verdict(&self) -> bool {
        self.state.verdict()
    }
}

/// Scans security configuration text for PKCS#11 providers backed by NSS.
pub struct ProviderScanner<'a> {
    marker: &'a str,
    library_file_name: &'a str,
    java_home: Option<&'a Path>,
    runner: &'a dyn CommandRunner,
}

impl<'a> ProviderScanner<'a> {
    pub fn new(
        marker: &'a str,
        library_file_name: &'a str,
        java_home: Option<&'a Path>,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            marker,
            library_file_name,
            java_home,
            runner,
        }
    }

    /// Resolve a provider argument to a descriptor path.
    pub fn descriptor_path(&self, config_path: &str) -> PathBuf {
        match self.java_home {
            Some(home) if config_path.contains(JAVA_HOME_PLACEHOLDER) => PathBuf::from(
                config_path.replace(JAVA_HOME_PLACEHOLDER, &home.to_string_lossy()),
            ),
            _ => PathBuf::from(config_path),
        }
    }

    /// Echo `contents` into `sink` line by line while evaluating provider
    /// lines.
    ///
    /// A malformed provider line or unreadable descriptor is reported inline
    /// and skipped. Only report write failures and interruptions are
    /// returned as errors.
    pub fn scan(&self, contents: &str, sink: &mut ReportSink<'_>) -> Result<ScanOutcome> {
        let mut outcome = ScanOutcome::default();

        for raw in contents.split_inclusive('\n') {
            sink.echo(raw)?;
            let line = raw.trim_end_matches(['\n', '\r']);

            if line.starts_with('#') || !line.contains(self.marker) {
                continue;
            }

            let provider: ProviderLine = match line.parse() {
                Ok(provider) => provider,
                Err(e) => {
                    tracing::warn!("{}", e);
                    sink.line("Problem parsing provider")?;
                    sink.line(&e.to_string())?;
                    continue;
                }
            };

            let Some(config_path) = provider.config_path.as_deref() else {
                outcome.state.reset();
                continue;
            };

            let path = self.descriptor_path(config_path);
            match LibraryConfig::load(&path, self.library_file_name, self.runner) {
                Ok(descriptor) => {
                    tracing::debug!(
                        rank = provider.rank,
                        installed = descriptor.is_installed,
                        "Evaluated NSS descriptor {}",
                        path.display()
                    );
                    outcome.state.record(provider.rank, descriptor.is_installed);
                    outcome.descriptors.push(descriptor);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("Cannot parse NSS descriptor {}: {}", path.display(), e);
                    sink.line("Error parsing NSS config file")?;
                    sink.line(&e.to_string())?;
                }
            }
        }

        Ok(outcome)
    }
}
