use crate::report::{self, ResultStats, SimilarityTier};
use crate::session::SearchOutcome;
use ragflow_core::models::{Chunk, Dataset};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

/// Output for health command
#[derive(Debug, Serialize)]
pub struct HealthOutput {
    pub url: String,
    pub healthy: bool,
}

/// Output for datasets command
#[derive(Debug, Serialize)]
pub struct DatasetsOutput {
    pub datasets: Vec<Dataset>,
}

#[derive(Tabled)]
pub struct DatasetRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<&Dataset> for DatasetRow {
    fn from(dataset: &Dataset) -> Self {
        Self {
            id: dataset.id.clone(),
            name: dataset.name.clone(),
        }
    }
}

/// Output for search command
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub dataset_ids: Vec<String>,
    pub stats: ResultStats,
    pub ai_summary: Option<String>,
    pub mind_map: Option<Value>,
    pub chunks: Vec<ChunkOutput>,
}

impl SearchOutput {
    pub fn new(outcome: &SearchOutcome, dataset_ids: &[String], use_highlight: bool) -> Self {
        Self {
            query: outcome.query.clone(),
            dataset_ids: dataset_ids.to_vec(),
            stats: ResultStats::from_chunks(&outcome.chunks),
            ai_summary: outcome.ai_summary.clone(),
            mind_map: outcome.mind_map.clone(),
            chunks: outcome
                .chunks
                .iter()
                .enumerate()
                .map(|(i, chunk)| ChunkOutput::new(i + 1, chunk, use_highlight))
                .collect(),
        }
    }
}

/// Per-chunk details
#[derive(Debug, Serialize)]
pub struct ChunkOutput {
    pub rank: usize,
    pub chunk_id: String,
    pub document_id: String,
    pub document_name: String,
    pub similarity: f64,
    pub vector_similarity: f64,
    pub term_similarity: f64,
    pub tier: SimilarityTier,
    pub text: String,
    pub content_length: usize,
}

impl ChunkOutput {
    pub fn new(rank: usize, chunk: &Chunk, use_highlight: bool) -> Self {
        Self {
            rank,
            chunk_id: chunk.chunk_id.clone(),
            document_id: chunk.document_id.clone(),
            document_name: chunk.document_name.clone(),
            similarity: chunk.similarity,
            vector_similarity: chunk.vector_similarity,
            term_similarity: chunk.term_similarity,
            tier: SimilarityTier::of(chunk.similarity),
            text: chunk.display_text(use_highlight).to_string(),
            content_length: chunk.content_length(),
        }
    }
}

#[derive(Tabled)]
pub struct ChunkRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Similarity")]
    pub similarity: String,
    #[tabled(rename = "Tier")]
    pub tier: String,
    #[tabled(rename = "Document")]
    pub document: String,
    #[tabled(rename = "Text")]
    pub text: String,
}

impl From<&ChunkOutput> for ChunkRow {
    fn from(chunk: &ChunkOutput) -> Self {
        Self {
            rank: chunk.rank,
            similarity: report::format_percent(chunk.similarity),
            tier: chunk.tier.label().to_string(),
            document: report::truncate(&chunk.document_name, 32),
            text: report::truncate(&report::strip_markup(&chunk.text), 72),
        }
    }
}

/// Output for summary command
#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub assistant_id: String,
    pub question: String,
    pub answer: String,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config_file: Option<String>,
    pub values: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
