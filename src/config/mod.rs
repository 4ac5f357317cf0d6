//! Configuration for aesdiag.
//!
//! - Schema definitions in [`schema`]
//! - File loading and override resolution in [`loader`]
//!
//! # Example
//!
//! ```
//! use aesdiag::config::{parse_config, DiagnosticConfig};
//! use std::path::Path;
//!
//! let config = parse_config("crypto_drivers: [aes-ce]", Path::new("aesdiag.yml")).unwrap();
//! assert_eq!(config.crypto_drivers, vec!["aes-ce".to_string()]);
//! assert_eq!(config.search_depth, DiagnosticConfig::default().search_depth);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config, JAVA_HOME_VAR};
pub use schema::DiagnosticConfig;
