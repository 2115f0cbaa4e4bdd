//! Datasets command implementation

use super::connect;
use crate::output::OutputWriter;
use crate::output_types::{DatasetRow, DatasetsOutput};
use crate::progress::with_spinner;
use anyhow::{Context, Result};
use ragflow_core::config::LayeredConfig;
use ragflow_core::models::Dataset;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = connect(config)?;

    let records = with_spinner("Loading datasets...", output.is_json(), "Datasets loaded", || {
        client.list_datasets()
    })
    .context("Failed to list datasets")?;
    let datasets = Dataset::from_records(&records);

    if output.is_json() {
        output.result(DatasetsOutput { datasets })?;
        return Ok(());
    }

    output.section(format!("Datasets ({})", datasets.len()));
    if datasets.is_empty() {
        output.info("No datasets found. Create one in the RAGFlow web UI.");
    } else {
        output.table(datasets.iter().map(DatasetRow::from).collect());
    }

    Ok(())
}
