use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use vctr::cli::Cli;
use vctr::registry::{install, Registry};

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let result = install(Registry::with_options(cli.options()))
        .and_then(|registry| cli.command.run(registry));

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "command failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
