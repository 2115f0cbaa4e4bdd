//! Health command implementation

use crate::output::OutputWriter;
use crate::output_types::HealthOutput;
use crate::progress::{create_spinner, finish_error, finish_success};
use anyhow::Result;
use ragflow_client::RagflowClient;
use ragflow_core::config::LayeredConfig;
use ragflow_core::models::ConnectionConfig;
use std::time::Duration;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    // Health check works without an API key
    let connection = ConnectionConfig::new(
        &config.base_url.value,
        config.api_key.value.clone().unwrap_or_default(),
    )
    .with_timeout(Duration::from_secs(config.timeout_secs.value));
    let url = connection.base_url().to_string();

    let client = RagflowClient::new(connection)?;
    let pb = create_spinner("Checking server...", output.is_json());
    let healthy = client.health_check();
    if healthy {
        finish_success(&pb, "Server answered");
    } else {
        finish_error(&pb, "No answer");
    }

    if output.is_json() {
        output.result(HealthOutput { url, healthy })?;
    } else if healthy {
        output.success(format!("Connected to {}", url));
    } else {
        output.warning(format!("Server unreachable: {}", url));
        output.info("Start RAGFlow or point to another server with --url");
    }

    Ok(())
}
