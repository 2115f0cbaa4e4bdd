use crate::commands::search::render;
use crate::errors;
use crate::output::OutputWriter;
use crate::progress::with_spinner;
use crate::session::{SearchSession, SearchSettings};
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use ragflow_core::config::{LayeredConfig, MAX_TOP_K};
use ragflow_core::models::ConnectionConfig;
use std::time::Duration;

/// Guided search session: connect, pick datasets, then query until the user quits
pub fn run(config: &LayeredConfig) -> Result<()> {
    println!("\n🔍 RAGFlow Search\n");

    let output = OutputWriter::new(false);
    let mut session = SearchSession::new(SearchSettings::from_config(config));
    if !connect(&mut session, config)? {
        return Ok(());
    }
    choose_datasets(&mut session)?;

    let actions = vec![
        "Search",
        "Show details of the last results",
        "Change datasets",
        "Search settings",
        "Reconnect",
        "Quit",
    ];

    loop {
        println!();
        let action = Select::new()
            .with_prompt("What next?")
            .items(&actions)
            .default(0)
            .interact()?;

        match action {
            0 => search(&mut session, &output)?,
            1 => match session.last_outcome() {
                Some(outcome) => render(outcome, session.settings.highlight, true, &output),
                None => println!("{}", style("No results yet").dim()),
            },
            2 => choose_datasets(&mut session)?,
            3 => adjust_settings(&mut session.settings)?,
            4 => {
                connect(&mut session, config)?;
            }
            _ => break,
        }
    }

    Ok(())
}

/// Prompt for URL and API key until a connection succeeds or the user gives up
///
/// Returns `false` when the user gave up without ever connecting.
fn connect(session: &mut SearchSession, config: &LayeredConfig) -> Result<bool> {
    loop {
        let url: String = Input::new()
            .with_prompt("RAGFlow URL")
            .default(config.base_url.value.clone())
            .interact_text()?;

        let api_key = match config.api_key.value.clone() {
            Some(key) => key,
            None => Password::new().with_prompt("API key").interact()?,
        };

        let connection = ConnectionConfig::new(&url, api_key)
            .with_timeout(Duration::from_secs(config.timeout_secs.value));

        let result = with_spinner("Connecting...", false, "Connected", || {
            session.connect(connection).map(|datasets| datasets.len())
        });

        match result {
            Ok(count) => {
                let url = session.client().map(|c| c.config().base_url()).unwrap_or_default();
                println!("{} Connected to {} ({} datasets)", style("✓").green().bold(), url, count);
                return Ok(true);
            }
            Err(e) => {
                errors::from_anyhow(e.into()).display();
                let retry = Confirm::new().with_prompt("Try again?").default(true).interact()?;
                if !retry {
                    return Ok(session.is_connected());
                }
            }
        }
    }
}

fn choose_datasets(session: &mut SearchSession) -> Result<()> {
    let datasets = session.datasets().to_vec();
    if datasets.is_empty() {
        errors::no_datasets().display();
        return Ok(());
    }

    let labels: Vec<String> = datasets
        .iter()
        .map(|d| if d.name == d.id { d.id.clone() } else { format!("{} ({})", d.name, d.id) })
        .collect();

    // Keep the current selection; preselect the first dataset otherwise
    let current = session.selected();
    let defaults: Vec<bool> = datasets
        .iter()
        .enumerate()
        .map(|(i, d)| if current.is_empty() { i == 0 } else { current.contains(&d.id) })
        .collect();

    let picked = MultiSelect::new()
        .with_prompt("Datasets to search (space to toggle)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    session.select(picked.into_iter().map(|i| datasets[i].id.clone()));
    if session.selected().is_empty() {
        errors::no_dataset_selected().display();
    }
    Ok(())
}

fn adjust_settings(settings: &mut SearchSettings) -> Result<()> {
    settings.top_k = Input::new()
        .with_prompt(format!("Top K (1-{})", MAX_TOP_K))
        .default(settings.top_k)
        .validate_with(|v: &usize| {
            if (1..=MAX_TOP_K).contains(v) {
                Ok(())
            } else {
                Err(format!("must be between 1 and {}", MAX_TOP_K))
            }
        })
        .interact_text()?;

    settings.similarity_threshold = unit_interval("Similarity threshold", settings.similarity_threshold)?;
    settings.vector_similarity_weight = unit_interval("Vector weight", settings.vector_similarity_weight)?;

    settings.highlight = Confirm::new()
        .with_prompt("Highlight matches?")
        .default(settings.highlight)
        .interact()?;
    settings.keyword = Confirm::new()
        .with_prompt("Extract keywords?")
        .default(settings.keyword)
        .interact()?;
    settings.use_kg = Confirm::new()
        .with_prompt("Use the knowledge graph?")
        .default(settings.use_kg)
        .interact()?;

    settings.rerank_id = optional_text("Rerank model ID (empty to disable)", &settings.rerank_id)?;
    settings.assistant_id = optional_text("Assistant ID for AI summaries (empty to disable)", &settings.assistant_id)?;

    settings.mind_map = Confirm::new()
        .with_prompt("Show the mind map of the first dataset?")
        .default(settings.mind_map)
        .interact()?;

    Ok(())
}

fn unit_interval(prompt: &str, current: f64) -> Result<f64> {
    let value = Input::new()
        .with_prompt(format!("{} (0.0-1.0)", prompt))
        .default(current)
        .validate_with(|v: &f64| {
            if (0.0..=1.0).contains(v) {
                Ok(())
            } else {
                Err("must be between 0.0 and 1.0")
            }
        })
        .interact_text()?;
    Ok(value)
}

fn optional_text(prompt: &str, current: &Option<String>) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn search(session: &mut SearchSession, output: &OutputWriter) -> Result<()> {
    let query: String = Input::new().with_prompt("Query").allow_empty(true).interact_text()?;
    if query.trim().is_empty() {
        return Ok(());
    }

    let highlight = session.settings.highlight;
    let result = with_spinner("Searching...", false, "Search finished", || {
        session.search(&query).cloned()
    });

    // A failed search keeps the previous results
    match result {
        Ok(outcome) => render(&outcome, highlight, false, output),
        Err(e) => errors::from_anyhow(e.into()).display(),
    }
    Ok(())
}
