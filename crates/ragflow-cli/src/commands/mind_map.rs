//! Mind map command implementation

use super::connect;
use crate::cli::MindMapArgs;
use crate::output::OutputWriter;
use crate::progress::with_spinner;
use anyhow::{Context, Result};
use ragflow_client::extract_mind_map;
use ragflow_core::config::LayeredConfig;
use serde_json::Value;

pub fn execute(args: MindMapArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = connect(config)?;

    let graph = with_spinner("Loading knowledge graph...", output.is_json(), "Knowledge graph loaded", || {
        client.get_mind_map(&args.dataset)
    })
    .with_context(|| format!("Failed to load the knowledge graph of dataset {}", args.dataset))?;

    let mind_map = extract_mind_map(&graph);

    if output.is_json() {
        output.result(mind_map.unwrap_or(Value::Null))?;
        return Ok(());
    }

    match mind_map {
        Some(mind_map) => {
            output.section(format!("Mind map of {}", args.dataset));
            output.data(&mind_map)?;
        }
        None => {
            output.info(format!("Dataset {} has no mind map yet", args.dataset));
            output.info("Enable the knowledge graph for the dataset and re-parse its documents");
        }
    }

    Ok(())
}
