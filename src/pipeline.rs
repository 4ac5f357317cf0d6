//! Report generation pipeline.
//!
//! Runs the checkers in a fixed order against one shared sink:
//! runtime, OS, then libnss. No checker reads another's output.

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

use crate::checks::{
    process_environment, Checker, CryptoLibraryChecker, OsSignalChecker,
    RuntimeEnvironmentChecker, Verdict,
};
use crate::config::DiagnosticConfig;
use crate::error::{AesDiagError, Result};
use crate::report::{ReportSink, BANNER};
use crate::shell::CommandRunner;

/// A configured report run.
pub struct Pipeline<'a> {
    config: &'a DiagnosticConfig,
    runner: &'a dyn CommandRunner,
    environment: Vec<(String, String)>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline that reports the current process environment.
    pub fn new(config: &'a DiagnosticConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            environment: process_environment(),
        }
    }

    /// Report `environment` instead of the process environment.
    pub fn with_environment(mut self, environment: Vec<(String, String)>) -> Self {
        self.environment = environment;
        self
    }

    /// Write the banner and every checker's findings to `sink`.
    pub fn run(&self, sink: &mut ReportSink<'_>) -> Result<Vec<Verdict>> {
        sink.append(BANNER)?;

        let checkers: Vec<Box<dyn Checker + '_>> = vec![
            Box::new(RuntimeEnvironmentChecker::new(
                self.config,
                self.runner,
                self.environment.clone(),
            )),
            Box::new(OsSignalChecker::new(self.config, self.runner)),
            Box::new(CryptoLibraryChecker::new(self.config, self.runner)),
        ];

        let mut verdicts = Vec::new();
        for checker in &checkers {
            tracing::info!("Running {} checker", checker.name());
            verdicts.extend(checker.check(sink)?);
        }

        sink.flush()?;
        Ok(verdicts)
    }

    /// Append a report to the file at `path`, creating it if needed.
    pub fn write_to(&self, path: &Path) -> Result<Vec<Verdict>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| AesDiagError::OutputOpen {
                path: path.to_path_buf(),
                source,
            })?;

        let mut writer = BufWriter::new(file);
        let mut sink = ReportSink::new(&mut writer);
        self.run(&mut sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandOutput, MockRunner};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> DiagnosticConfig {
        fs::write(temp.path().join("cpuinfo"), "flags\t\t: aes\n").unwrap();
        fs::write(temp.path().join("crypto"), "module : aesni_intel\n").unwrap();
        DiagnosticConfig {
            release_files: Vec::new(),
            cpuinfo_path: temp.path().join("cpuinfo"),
            crypto_path: temp.path().join("crypto"),
            ..Default::default()
        }
    }

    fn runner() -> MockRunner {
        MockRunner::new()
            .with_output("uname -a", CommandOutput::success("Linux\n"))
            .with_output("lscpu", CommandOutput::success("Flags: aes\n"))
    }

    #[test]
    fn checkers_run_in_order() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let runner = runner();
        let pipeline = Pipeline::new(&config, &runner).with_environment(Vec::new());

        let mut buf = Vec::new();
        let verdicts = {
            let mut sink = ReportSink::new(&mut buf);
            pipeline.run(&mut sink).unwrap()
        };
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with(BANNER));
        let runtime = text.find("[[Start Runtime Properties]]").unwrap();
        let os = text.find("[[Start uname -a output]]").unwrap();
        let libnss = text.find("[[Libnss package details]]").unwrap();
        assert!(runtime < os && os < libnss);

        let values: Vec<bool> = verdicts.iter().map(|v| v.value).collect();
        assert_eq!(values, vec![true, true, false, false]);
    }

    #[test]
    fn write_to_appends() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let runner = runner();
        let out = temp.path().join("report.txt");
        fs::write(&out, "previous run\n").unwrap();

        Pipeline::new(&config, &runner)
            .with_environment(Vec::new())
            .write_to(&out)
            .unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with(&format!("previous run\n{}", BANNER)));
    }

    #[test]
    fn unopenable_output_is_output_open_error() {
        let config = DiagnosticConfig::default();
        let runner = MockRunner::new();
        let err = Pipeline::new(&config, &runner)
            .write_to(&PathBuf::from("/nonexistent/dir/report.txt"))
            .unwrap_err();
        assert!(matches!(err, AesDiagError::OutputOpen { .. }));
    }

    #[test]
    fn interruption_stops_the_pipeline() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let runner = MockRunner::new().with_interruption("uname -a");
        let pipeline = Pipeline::new(&config, &runner).with_environment(Vec::new());

        let mut buf = Vec::new();
        let mut sink = ReportSink::new(&mut buf);
        let err = pipeline.run(&mut sink).unwrap_err();
        assert!(matches!(err, AesDiagError::Interrupted { .. }));
        assert!(!runner.calls().contains(&"lscpu".to_string()));
    }
}
