//! Runtime evidence: process properties, JVM system properties, the process
//! environment and the registered security providers.
//!
//! Pure enumeration; nothing here produces a verdict.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::DiagnosticConfig;
use crate::error::Result;
use crate::report::ReportSink;
use crate::security::list_providers;
use crate::shell::CommandRunner;

use super::{locate_security_file, read_text, run_logged, Checker, Verdict};

/// Snapshot of the process environment, sorted by key.
pub fn process_environment() -> Vec<(String, String)> {
    std::env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect()
}

/// Dumps the runtime layer of the report.
pub struct RuntimeEnvironmentChecker<'a> {
    config: &'a DiagnosticConfig,
    runner: &'a dyn CommandRunner,
    environment: Vec<(String, String)>,
}

impl<'a> RuntimeEnvironmentChecker<'a> {
    /// Create a checker that reports `environment` as the process environment.
    pub fn new(
        config: &'a DiagnosticConfig,
        runner: &'a dyn CommandRunner,
        environment: Vec<(String, String)>,
    ) -> Self {
        Self {
            config,
            runner,
            environment,
        }
    }

    fn runtime_properties(&self) -> BTreeMap<&'static str, String> {
        let java_home = self
            .config
            .java_home
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string());

        BTreeMap::from([
            ("aesdiag.version", env!("CARGO_PKG_VERSION").to_string()),
            ("java.home", java_home),
            ("os.arch", std::env::consts::ARCH.to_string()),
            ("os.family", std::env::consts::FAMILY.to_string()),
            ("os.name", std::env::consts::OS.to_string()),
        ])
    }

    fn log_runtime_properties(&self, sink: &mut ReportSink<'_>) -> Result<()> {
        sink.start("Runtime Properties")?;
        for (key, value) in self.runtime_properties() {
            sink.line(&format!("{} : {}", key, value))?;
        }
        sink.end("Runtime Properties")?;
        sink.blank()
    }

    fn java_binary(&self) -> PathBuf {
        match &self.config.java_home {
            Some(home) => home.join("bin").join("java"),
            None => PathBuf::from("java"),
        }
    }

    /// The JVM prints its property listing on stderr, so both streams are kept.
    fn log_java_properties(&self, sink: &mut ReportSink<'_>) -> Result<()> {
        let label = "Java System Properties";
        let java = self.java_binary();
        let java = java.to_string_lossy();

        sink.start(label)?;
        let args = ["-XshowSettings:properties", "-version"];
        if let Some(output) = run_logged(self.runner, sink, "java", &java, &args)? {
            sink.echo(&output.stdout)?;
            sink.echo(&output.stderr)?;
        }
        sink.end(label)?;
        sink.blank()
    }

    fn log_environment(&self, sink: &mut ReportSink<'_>) -> Result<()> {
        sink.start("Environment")?;
        for (key, value) in &self.environment {
            sink.line(&format!("{} : {}", key, value))?;
        }
        sink.end("Environment")?;
        sink.blank()
    }

    fn log_security_providers(&self, sink: &mut ReportSink<'_>) -> Result<()> {
        sink.marker("Security Providers")?;

        let listing = locate_security_file(self.config).and_then(|path| {
            read_text(&path).map_err(|e| format!("Can't read: {} ({})", path.display(), e))
        });

        match listing {
            Ok(contents) => {
                for provider in list_providers(&contents) {
                    sink.line(&format!("{}: {}", provider.rank, provider.class_name))?;
                    if let Some(config) = &provider.config_path {
                        sink.line(&format!("    config : {}", config))?;
                    }
                }
            }
            Err(reason) => sink.line(&reason)?,
        }

        sink.blank()?;
        sink.marker("Security providers Environment")?;
        sink.blank()
    }
}

impl Checker for RuntimeEnvironmentChecker<'_> {
    fn name(&self) -> &str {
        "runtime"
    }

    fn check(&self, sink: &mut ReportSink<'_>) -> Result<Vec<Verdict>> {
        self.log_runtime_properties(sink)?;
        self.log_java_properties(sink)?;
        self.log_environment(sink)?;
        self.log_security_providers(sink)?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandOutput, MockRunner};
    use std::fs;
    use tempfile::TempDir;

    fn run(config: &DiagnosticConfig, runner: &MockRunner, env: Vec<(String, String)>) -> String {
        let checker = RuntimeEnvironmentChecker::new(config, runner, env);
        let mut buf = Vec::new();
        {
            let mut sink = ReportSink::new(&mut buf);
            let verdicts = checker.check(&mut sink).unwrap();
            assert!(verdicts.is_empty());
        }
        String::from_utf8(buf).unwrap()
    }

    fn java_home() -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("conf/security");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("java.security"),
            "security.provider.2=SunRsaSign\nsecurity.provider.1=SUN\n#security.provider.9=Off\nsecurity.provider.3=SunPKCS11 /etc/nss.cfg\n",
        )
        .unwrap();
        temp
    }

    #[test]
    fn process_environment_is_sorted() {
        let env = process_environment();
        let keys: Vec<_> = env.iter().map(|(k, _)| k.clone()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn dumps_environment_in_given_order() {
        let env = vec![
            ("HOME".to_string(), "/root".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ];
        let text = run(&DiagnosticConfig::default(), &MockRunner::new(), env);
        assert!(text.contains(
            "[[Start Environment]]\nHOME : /root\nPATH : /usr/bin\n[[End Environment]]\n\n"
        ));
    }

    #[test]
    fn java_properties_use_java_home_binary() {
        let temp = java_home();
        let config = DiagnosticConfig {
            java_home: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let command = format!(
            "{} -XshowSettings:properties -version",
            temp.path().join("bin/java").display()
        );
        let runner = MockRunner::new().with_output(
            &command,
            CommandOutput::exited(0, "", "Property settings:\n    java.version = 17.0.9\n"),
        );

        let text = run(&config, &runner, Vec::new());
        assert!(text.contains(
            "[[Start Java System Properties]]\nProperty settings:\n    java.version = 17.0.9\n[[End Java System Properties]]\n"
        ));
        assert_eq!(runner.calls(), vec![command]);
    }

    #[test]
    fn missing_java_is_reported_inline() {
        let text = run(&DiagnosticConfig::default(), &MockRunner::new(), Vec::new());
        assert!(text.contains("[[Start Java System Properties]]\nError running java:\n"));
        assert!(text.contains("java.home : (not set)\n"));
    }

    #[test]
    fn lists_security_providers_by_rank() {
        let temp = java_home();
        let config = DiagnosticConfig {
            java_home: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let text = run(&config, &MockRunner::new(), Vec::new());
        assert!(text.ends_with(
            "[[Security Providers]]\n1: SUN\n2: SunRsaSign\n3: SunPKCS11\n    config : /etc/nss.cfg\n\n[[Security providers Environment]]\n\n"
        ));
    }

    #[test]
    fn providers_section_explains_missing_file() {
        let text = run(&DiagnosticConfig::default(), &MockRunner::new(), Vec::new());
        assert!(text.contains(
            "[[Security Providers]]\nCouldn't find java.security file: no Java home configured\n"
        ));
    }
}
