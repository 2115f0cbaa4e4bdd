//! Command implementations

mod config;
mod datasets;
mod health;
mod interactive;
mod mind_map;
pub(crate) mod search;
mod summary;

use crate::cli::{Cli, Commands};
use crate::config::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use ragflow_client::RagflowClient;
use ragflow_core::config::LayeredConfig;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Health => health::execute(&config, &output),
        Commands::Datasets => datasets::execute(&config, &output),
        Commands::Search(args) => search::execute(args, &config, &output),
        Commands::MindMap(args) => mind_map::execute(args, &config, &output),
        Commands::Summary(args) => summary::execute(args, &config, &output),
        Commands::Interactive => interactive::execute(&config, &output),
        Commands::Config => config::execute(cli.config.as_ref(), &config, &output),
    }
}

/// Build a client from the effective configuration; requires an API key
fn connect(config: &LayeredConfig) -> Result<RagflowClient> {
    let connection = config.connection()?;
    Ok(RagflowClient::new(connection)?)
}
