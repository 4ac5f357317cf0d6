//! aesdiag - Evidence collection for hardware AES acceleration.
//!
//! aesdiag appends a plain-text report describing whether AES-NI is
//! available and whether the JVM's PKCS#11 provider is backed by an
//! installed NSS library.
//!
//! # Modules
//!
//! - [`checks`] - The runtime, OS and libnss checkers
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and defaults
//! - [`error`] - Error types and result aliases
//! - [`heuristics`] - Pure AES detection heuristics over captured text
//! - [`pipeline`] - Ordered execution of the checkers
//! - [`report`] - Append-only report writer
//! - [`security`] - Security provider and NSS descriptor parsing
//! - [`shell`] - External command execution
//!
//! # Example
//!
//! ```
//! use aesdiag::heuristics::cpu_flags;
//!
//! let cpuinfo = "processor\t: 0\nflags\t\t: fpu aes\n\nprocessor\t: 1\nflags\t\t: fpu\n";
//! let keys = vec!["flags".to_string()];
//! let result = cpu_flags(cpuinfo, &keys);
//! assert!(!result.supported);
//! assert_eq!(result.summary, " cpus: 2 cpus with aes: 1");
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod pipeline;
pub mod report;
pub mod security;
pub mod shell;

pub use error::{AesDiagError, Result};
