mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use deliverable_core::{telemetry, DeliverableConfig};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let config = DeliverableConfig::from_env()?;
    if let Err(error) = telemetry::init(&config.telemetry) {
        eprintln!("warning: {error}");
    }

    let result = commands::run(&cli, &config).await?;
    output::render(&result.data, cli.pretty)?;

    // The report is still printed when some vendors failed.
    if result.failures > 0 {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
