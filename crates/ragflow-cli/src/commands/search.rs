//! Search command implementation

use crate::cli::SearchArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{ChunkOutput, ChunkRow, SearchOutput};
use crate::progress::with_spinner;
use crate::report::{emphasize, format_percent};
use crate::session::{SearchOutcome, SearchSession, SearchSettings};
use anyhow::Result;
use console::style;
use ragflow_core::config::LayeredConfig;

pub fn execute(args: SearchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let connection = config.connection()?;
    let mut session = SearchSession::new(settings_from_args(&args, config));

    let datasets = with_spinner("Connecting...", output.is_json(), "Connected", || {
        session.connect(connection).map(|datasets| datasets.to_vec())
    })?;

    // Default to the first listed dataset
    if args.datasets.is_empty() {
        let first = datasets.first().ok_or_else(errors::no_datasets)?;
        tracing::debug!("No dataset given, using {} ({})", first.name, first.id);
        session.select([first.id.clone()]);
    } else {
        session.select(args.datasets.iter().cloned());
    }

    let use_highlight = session.settings.highlight;
    let selected = session.selected().to_vec();
    let outcome = with_spinner("Searching...", output.is_json(), "Search finished", || {
        session.search(&args.query).cloned()
    })?;

    if output.is_json() {
        output.result(SearchOutput::new(&outcome, &selected, use_highlight))?;
    } else {
        render(&outcome, use_highlight, args.full, output);
    }

    Ok(())
}

fn settings_from_args(args: &SearchArgs, config: &LayeredConfig) -> SearchSettings {
    let mut settings = SearchSettings::from_config(config);

    if let Some(top_k) = args.top_k {
        settings.top_k = top_k;
    }
    if let Some(threshold) = args.threshold {
        settings.similarity_threshold = threshold;
    }
    if let Some(weight) = args.vector_weight {
        settings.vector_similarity_weight = weight;
    }
    if args.no_highlight {
        settings.highlight = false;
    }
    if args.keyword {
        settings.keyword = true;
    }

    settings.use_kg = args.kg;
    settings.rerank_id = args.rerank.clone();
    settings.document_ids = args.documents.clone();
    settings.assistant_id = args.assistant.clone();
    settings.mind_map = args.mind_map;
    settings
}

/// Print a search outcome for humans
///
/// With `full`, every chunk is printed with its complete text and details;
/// otherwise the chunks are summarised in a table.
pub(crate) fn render(outcome: &SearchOutcome, use_highlight: bool, full: bool, output: &OutputWriter) {
    output.section(format!("Results for \"{}\"", outcome.query));

    if outcome.chunks.is_empty() {
        println!("\n{}", style("Nothing found").bold());
        println!(
            "{}",
            style("Try rephrasing the query or lowering the similarity threshold (--threshold).").dim()
        );
        return;
    }

    if let Some(summary) = outcome.ai_summary.as_deref().filter(|s| !s.is_empty()) {
        output.section("AI Summary");
        println!("{}", summary);
    }

    if let Some(mind_map) = &outcome.mind_map {
        output.section("Mind Map");
        if let Err(e) = output.data(mind_map) {
            tracing::warn!("Failed to print mind map: {}", e);
        }
    }

    let view = SearchOutput::new(outcome, &[], use_highlight);
    output.section("Statistics");
    output.kv("Chunks", view.stats.count);
    output.kv("Mean similarity", format_percent(view.stats.mean_similarity));
    output.kv("Max similarity", format_percent(view.stats.max_similarity));
    output.kv("Documents", view.stats.distinct_documents);

    if full {
        for chunk in &view.chunks {
            render_chunk(chunk);
        }
    } else {
        output.section("Chunks");
        output.table(view.chunks.iter().map(ChunkRow::from).collect());
    }
}

fn render_chunk(chunk: &ChunkOutput) {
    println!(
        "\n{} {}  {} {}",
        style(format!("#{}", chunk.rank)).bold(),
        style(&chunk.document_name).cyan().bold(),
        chunk.tier.badge(),
        format_percent(chunk.similarity),
    );
    println!("{}", emphasize(&chunk.text));
    println!(
        "{}",
        style(format!(
            "chunk {} | document {} | vector {} | term {} | {} chars",
            chunk.chunk_id,
            chunk.document_id,
            format_percent(chunk.vector_similarity),
            format_percent(chunk.term_similarity),
            chunk.content_length,
        ))
        .dim()
    );
}
