//! aesdiag CLI entry point.

use std::process::ExitCode;

use aesdiag::cli::Cli;
use aesdiag::config::load_config;
use aesdiag::pipeline::Pipeline;
use aesdiag::shell::SystemRunner;
use aesdiag::AesDiagError;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit status used when a subprocess wait was interrupted.
const EXIT_INTERRUPTED: u8 = 130;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("aesdiag=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aesdiag=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };
    init_tracing(cli.debug);

    tracing::debug!("aesdiag starting with args: {:?}", cli);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config.resolve_java_home(cli.java_home.clone(), |key| std::env::var(key)),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    let runner = SystemRunner;
    match Pipeline::new(&config, &runner).write_to(&cli.output) {
        Ok(verdicts) => {
            for verdict in verdicts {
                println!("{}", verdict);
            }
            ExitCode::SUCCESS
        }
        Err(AesDiagError::Interrupted { command }) => {
            tracing::warn!("Interrupted while waiting for '{}', stopping", command);
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
