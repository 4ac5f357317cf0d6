//! Command-line interface for aesdiag.
//!
//! - [`args`] - Argument definitions using clap derive macros

pub mod args;

pub use args::Cli;
