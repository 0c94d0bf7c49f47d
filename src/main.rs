//! Vigilo Cart CLI

use std::{io, process::ExitCode};

use clap::Parser;
use tracing::error;
use vigilo_cart::observability;

use crate::cli::Cli;

mod cli;
mod config;

/// Vigilo Cart CLI entry point
pub fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = observability::init(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {e}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run(io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "cart command failed");

            #[expect(clippy::print_stderr, reason = "command errors are reported to the user")]
            {
                eprintln!("{e}");
            }

            ExitCode::FAILURE
        }
    }
}
