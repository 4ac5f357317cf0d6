//! `security.provider.<rank>=<class> [config]` lines.
//!
//! The parser is position based and assumes this single shape. Quoting,
//! escaping and line continuations are not understood.

use std::str::FromStr;

use crate::error::AesDiagError;

/// Key prefix of a provider registration.
pub const PROVIDER_PREFIX: &str = "security.provider.";

/// A parsed provider registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLine {
    /// Priority, 1 being the highest.
    pub rank: u32,

    /// Provider class (or provider name) token.
    pub class_name: String,

    /// Configuration argument, present only when non-blank.
    pub config_path: Option<String>,
}

impl ProviderLine {
    fn malformed(line: &str, message: &str) -> AesDiagError {
        AesDiagError::ProviderLine {
            line: line.to_string(),
            message: message.to_string(),
        }
    }
}

impl FromStr for ProviderLine {
    type Err = AesDiagError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (_, after_prefix) = line
            .split_once(PROVIDER_PREFIX)
            .ok_or_else(|| Self::malformed(line, "missing 'security.provider.' prefix"))?;

        let (rank, value) = after_prefix
            .split_once('=')
            .ok_or_else(|| Self::malformed(line, "missing '='"))?;

        let rank: u32 = rank
            .trim()
            .parse()
            .map_err(|e| Self::malformed(line, &format!("invalid rank '{}': {}", rank, e)))?;

        let value = value.trim_start();
        let (class_name, config) = match value.split_once(char::is_whitespace) {
            Some((class_name, config)) => (class_name, config.trim()),
            None => (value.trim_end(), ""),
        };

        if class_name.is_empty() {
            return Err(Self::malformed(line, "missing provider class"));
        }

        Ok(Self {
            rank,
            class_name: class_name.to_string(),
            config_path: (!config.is_empty()).then(|| config.to_string()),
        })
    }
}

/// All well-formed, uncommented provider registrations, ordered by rank.
pub fn list_providers(contents: &str) -> Vec<ProviderLine> {
    let mut providers: Vec<ProviderLine> = contents
        .lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with(PROVIDER_PREFIX))
        .filter_map(|line| line.parse().ok())
        .collect();
    providers.sort_by_key(|p| p.rank);
    providers
}
