//! Interactive command implementation

use crate::errors::CliError;
use crate::output::OutputWriter;
use anyhow::Result;
use ragflow_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        return Err(CliError::new("Interactive mode does not support --json")
            .with_suggestion("Use the search command instead: ragflow-search search <query> --json")
            .into());
    }

    crate::interactive::run(config)
}
