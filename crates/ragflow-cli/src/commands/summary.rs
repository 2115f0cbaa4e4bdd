//! Summary command implementation

use super::connect;
use crate::cli::SummaryArgs;
use crate::output::OutputWriter;
use crate::output_types::SummaryOutput;
use crate::progress::with_spinner;
use anyhow::{Context, Result};
use ragflow_client::extract_answer;
use ragflow_core::config::LayeredConfig;
use ragflow_core::Envelope;

pub fn execute(args: SummaryArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = connect(config)?;

    let response = with_spinner("Asking the assistant...", output.is_json(), "Answer received", || {
        client.get_ai_summary(&args.assistant, &args.question, args.session.as_deref())
    })
    .with_context(|| format!("Failed to get an answer from assistant {}", args.assistant))?;

    // The completion response still carries its own code
    Envelope::decode(&response).into_result()?;
    let answer = extract_answer(&response);

    if output.is_json() {
        output.result(SummaryOutput {
            assistant_id: args.assistant,
            question: args.question,
            answer,
        })?;
        return Ok(());
    }

    output.section("AI Summary");
    if answer.is_empty() {
        output.info("The assistant returned no answer");
    } else {
        println!("{}", answer);
    }

    Ok(())
}
