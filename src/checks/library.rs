//! libnss evidence: package metadata and the security provider configuration.

use crate::config::DiagnosticConfig;
use crate::error::{AesDiagError, Result};
use crate::report::ReportSink;
use crate::security::{LibraryConfig, ProviderScanner};
use crate::shell::CommandRunner;

use super::{locate_security_file, read_text, Checker, Verdict};

/// Package queries tried in order until one can be started.
const PACKAGE_QUERIES: &[(&str, &[&str])] = &[
    ("dpkg", &["-s", "libnss3"]),
    ("yum", &["info", "nss", "binutils"]),
];

/// Checks whether an installed NSS library backs the top security provider.
pub struct CryptoLibraryChecker<'a> {
    config: &'a DiagnosticConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> CryptoLibraryChecker<'a> {
    pub fn new(config: &'a DiagnosticConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Log the first package query that can be started.
    fn log_package_details(&self, sink: &mut ReportSink<'_>) -> Result<()> {
        sink.marker("Libnss package details")?;

        for (program, args) in PACKAGE_QUERIES {
            match self.runner.run(program, args) {
                Ok(output) => {
                    if let Some(note) = output.exit_note(program) {
                        sink.line(&note)?;
                    }
                    sink.echo(&output.stdout)?;
                    break;
                }
                Err(e @ AesDiagError::Interrupted { .. }) => return Err(e),
                Err(e) => {
                    tracing::debug!("Package query {} unavailable: {}", program, e);
                    sink.line(&format!("Error running {}:", program))?;
                    sink.line(&e.to_string())?;
                }
            }
        }

        sink.marker("End libnss package details")?;
        sink.blank()
    }

    /// Scan the security configuration and report every NSS descriptor found.
    fn detect_nss_in_security_settings(&self, sink: &mut ReportSink<'_>) -> Result<bool> {
        sink.marker("Security settings file")?;

        let contents = match locate_security_file(self.config) {
            Ok(path) if !path.exists() => Err(format!("{} doesn't exist", path.display())),
            Ok(path) => read_text(&path).map_err(|_| format!("Can't read: {}", path.display())),
            Err(reason) => Err(reason),
        };

        let contents = match contents {
            Ok(contents) => contents,
            Err(reason) => {
                tracing::warn!("{}", reason);
                sink.line(&reason)?;
                sink.marker("End security settings file")?;
                sink.blank()?;
                return Ok(false);
            }
        };

        let scanner = ProviderScanner::new(
            &self.config.provider_marker,
            &self.config.library_file_name,
            self.config.java_home.as_deref(),
            self.runner,
        );
        let outcome = scanner.scan(&contents, sink)?;

        sink.marker("End security settings file")?;
        sink.blank()?;

        for descriptor in &outcome.descriptors {
            log_descriptor(descriptor, sink)?;
        }

        let verdict = outcome.verdict();
        sink.summary("Libnss configured at highest priority", verdict)?;
        sink.blank()?;
        Ok(verdict)
    }
}

fn log_descriptor(descriptor: &LibraryConfig, sink: &mut ReportSink<'_>) -> Result<()> {
    let path = descriptor.source_path.display();

    sink.start(&format!("nss config: {}", path))?;
    sink.echo(&descriptor.raw_contents)?;
    sink.marker("End nss config")?;

    sink.start(&format!("nss config detail: {}", path))?;
    sink.blank()?;
    sink.line("NSS library information:")?;
    sink.blank()?;
    sink.echo(&descriptor.resolution_detail)?;
    sink.end(&format!("nss config detail: {}", path))
}

impl Checker for CryptoLibraryChecker<'_> {
    fn name(&self) -> &str {
        "libnss"
    }

    fn check(&self, sink: &mut ReportSink<'_>) -> Result<Vec<Verdict>> {
        self.log_package_details(sink)?;
        let configured = self.detect_nss_in_security_settings(sink)?;
        Ok(vec![Verdict::new(
            "Libnss configured in java security settings",
            configured,
        )])
    }
}
