//! Configuration schema for aesdiag.
//!
//! Every field has a default, so an empty YAML document (or no file at
//! all) produces the stock x86-64 Linux behaviour.

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagnosticConfig {
    /// Root of the Java runtime installation to inspect.
    pub java_home: Option<PathBuf>,

    /// OS identification files echoed into the report when present.
    pub release_files: Vec<PathBuf>,

    /// Pseudo-file with one record per logical CPU.
    pub cpuinfo_path: PathBuf,

    /// Pseudo-file listing registered kernel crypto drivers.
    pub crypto_path: PathBuf,

    /// Record labels in the CPU pseudo-file that list CPU features.
    pub cpu_flag_keys: Vec<String>,

    /// Kernel crypto drivers that must all be registered.
    pub crypto_drivers: Vec<String>,

    /// File name of the security provider configuration.
    pub security_file_name: String,

    /// Maximum directory depth searched below `java_home`.
    pub search_depth: usize,

    /// Substring identifying a PKCS#11 provider line.
    pub provider_marker: String,

    /// Shared library expected in an NSS library directory.
    pub library_file_name: String,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            java_home: None,
            release_files: [
                "/etc/lsb-release",
                "/etc/redhat-release",
                "/etc/centos-release",
                "/etc/debian_version",
                "/etc/issue",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
            cpuinfo_path: PathBuf::from("/proc/cpuinfo"),
            crypto_path: PathBuf::from("/proc/crypto"),
            cpu_flag_keys: vec!["flags".to_string(), "Features".to_string()],
            crypto_drivers: vec!["aesni_intel".to_string(), "aes_x86_64".to_string()],
            security_file_name: "java.security".to_string(),
            search_depth: 8,
            provider_marker: "sun.security.pkcs11.SunPKCS11".to_string(),
            library_file_name: "libnss3.so".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: DiagnosticConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, DiagnosticConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let yaml = r#"
crypto_drivers: [aes-ce, aes-arm64]
search_depth: 4
"#;
        let config: DiagnosticConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.crypto_drivers, vec!["aes-ce", "aes-arm64"]);
        assert_eq!(config.search_depth, 4);
        assert_eq!(config.cpuinfo_path, PathBuf::from("/proc/cpuinfo"));
        assert_eq!(config.library_file_name, "libnss3.so");
    }

    #[test]
    fn defaults_match_linux_locations() {
        let config = DiagnosticConfig::default();
        assert_eq!(config.release_files.len(), 5);
        assert_eq!(config.search_depth, 8);
        assert_eq!(config.security_file_name, "java.security");
        assert!(config.java_home.is_none());
    }
}
