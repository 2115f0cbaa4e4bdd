//! Config command implementation

use crate::config::find_config_file;
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use ragflow_core::config::LayeredConfig;
use std::path::PathBuf;

pub fn execute(explicit: Option<&PathBuf>, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let config_file = find_config_file(explicit).map(|path| path.display().to_string());
    let values: Vec<ConfigEntry> = config
        .to_inspection_entries()
        .into_iter()
        .map(|(key, value, source)| ConfigEntry {
            key,
            value,
            source: source.label().to_string(),
        })
        .collect();

    if output.is_json() {
        output.result(ConfigOutput { config_file, values })?;
        return Ok(());
    }

    output.section("Configuration");
    output.kv("Config file", config_file.as_deref().unwrap_or("(none)"));
    output.table(values);

    if config.api_key.value.is_none() {
        output.info("No API key set. Use --api-key, RAGFLOW_API_KEY or api_key in ragflow.toml");
    }

    Ok(())
}
