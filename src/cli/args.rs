//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

/// aesdiag - Collect evidence of hardware AES acceleration.
#[derive(Debug, Parser)]
#[command(name = "aesdiag")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Report file to append to (created if missing)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Path to a YAML config file
    #[arg(short, long, env = "AESDIAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Java runtime root to inspect (overrides config and JAVA_HOME)
    #[arg(long)]
    pub java_home: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
