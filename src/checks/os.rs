//! OS-level evidence: system identification and three AES heuristics.

use std::fs::File;
use std::path::Path;

use crate::config::DiagnosticConfig;
use crate::error::Result;
use crate::heuristics::{self, HeuristicResult};
use crate::report::ReportSink;
use crate::shell::CommandRunner;

use super::{read_text, run_logged, Checker, Verdict};

/// Collects CPU and kernel AES signals.
///
/// The three heuristics run unconditionally and are reported separately;
/// no combined verdict is computed.
pub struct OsSignalChecker<'a> {
    config: &'a DiagnosticConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> OsSignalChecker<'a> {
    pub fn new(config: &'a DiagnosticConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    fn log_uname(&self, sink: &mut ReportSink<'_>) -> Result<()> {
        let label = "uname -a output";
        sink.start(label)?;
        if let Some(output) = run_logged(self.runner, sink, "uname", "uname", &["-a"])? {
            sink.echo(&output.stdout)?;
        }
        sink.end(label)?;
        sink.blank()
    }

    /// Echo a release file if it exists and can be read; skip it otherwise.
    fn log_file_if_exists(&self, path: &Path, sink: &mut ReportSink<'_>) -> Result<()> {
        if !path.is_file() || File::open(path).is_err() {
            tracing::debug!("Skipping {}", path.display());
            return Ok(());
        }

        let Ok(contents) = read_text(path) else {
            return Ok(());
        };

        let label = path.display().to_string();
        sink.start(&label)?;
        sink.echo(&contents)?;
        sink.end(&label)?;
        sink.blank()
    }

    /// Echo a pseudo-file and evaluate it with `heuristic`.
    ///
    /// A missing file is reported inline and yields `false`.
    fn pseudo_file_heuristic(
        &self,
        sink: &mut ReportSink<'_>,
        path: &Path,
        what: &str,
        heuristic: impl Fn(&str) -> HeuristicResult,
    ) -> Result<bool> {
        let label = path.display().to_string();
        sink.start(&label)?;

        let contents = match read_text(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", label, e);
                sink.line(&format!("Could not find {} data at path: {}", what, label))?;
                sink.end(&label)?;
                sink.blank()?;
                return Ok(false);
            }
        };

        let result = heuristic(&contents);
        sink.echo(&result.evidence)?;
        sink.end(&label)?;
        sink.marker(&result.summary)?;
        sink.blank()?;
        Ok(result.supported)
    }

    fn cpu_topology_heuristic(&self, sink: &mut ReportSink<'_>) -> Result<bool> {
        let label = "lscpu output";
        sink.start(label)?;

        let Some(output) = run_logged(self.runner, sink, "lscpu", "lscpu", &[])? else {
            sink.end(label)?;
            sink.blank()?;
            return Ok(false);
        };

        let result = heuristics::cpu_topology(&output.stdout);
        sink.echo(&result.evidence)?;
        sink.end(label)?;
        sink.marker(&result.summary)?;
        sink.blank()?;
        Ok(result.supported)
    }
}

impl Checker for OsSignalChecker<'_> {
    fn name(&self) -> &str {
        "os"
    }

    fn check(&self, sink: &mut ReportSink<'_>) -> Result<Vec<Verdict>> {
        self.log_uname(sink)?;
        for path in &self.config.release_files {
            self.log_file_if_exists(path, sink)?;
        }

        let cpuinfo = &self.config.cpuinfo_path;
        let cpu_flags = self.pseudo_file_heuristic(sink, cpuinfo, "cpuinfo", |text| {
            heuristics::cpu_flags(text, &self.config.cpu_flag_keys)
        })?;

        let topology = self.cpu_topology_heuristic(sink)?;

        let crypto = &self.config.crypto_path;
        let kernel_crypto = self.pseudo_file_heuristic(sink, crypto, "crypto", |text| {
            heuristics::kernel_crypto(text, &self.config.crypto_drivers)
        })?;

        sink.blank()?;

        Ok(vec![
            Verdict::new(format!("AES support shown in {}", cpuinfo.display()), cpu_flags),
            Verdict::new("AES support shown in lscpu", topology),
            Verdict::new(format!("AES support shown in {}", crypto.display()), kernel_crypto),
        ])
    }
}
