//! RAGFlow Search CLI - Terminal front end
//!
//! This is the interactive adapter over the RAGFlow retrieval client.

mod cli;
mod commands;
mod config;
mod errors;
mod interactive;
mod output;
mod output_types;
mod progress;
mod report;
mod session;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize tracing; stay quiet unless RUST_LOG asks for more
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let json = cli.json;

    // Execute the command
    match commands::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            errors::report(error, json);
            ExitCode::FAILURE
        }
    }
}
