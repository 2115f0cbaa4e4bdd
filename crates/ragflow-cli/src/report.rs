//! Result statistics and score presentation

use console::{style, StyledObject};
use ragflow_core::models::Chunk;
use serde::Serialize;
use std::collections::HashSet;

/// Aggregate figures over one result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultStats {
    pub count: usize,
    pub mean_similarity: f64,
    pub max_similarity: f64,
    pub distinct_documents: usize,
}

impl ResultStats {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        if chunks.is_empty() {
            return Self {
                count: 0,
                mean_similarity: 0.0,
                max_similarity: 0.0,
                distinct_documents: 0,
            };
        }

        let total: f64 = chunks.iter().map(|c| c.similarity).sum();
        let max = chunks.iter().map(|c| c.similarity).fold(f64::MIN, f64::max);
        let documents: HashSet<&str> = chunks.iter().map(|c| c.document_name.as_str()).collect();

        Self {
            count: chunks.len(),
            mean_similarity: total / chunks.len() as f64,
            max_similarity: max,
            distinct_documents: documents.len(),
        }
    }
}

/// Coarse relevance band of a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityTier {
    High,
    Medium,
    Low,
}

impl SimilarityTier {
    pub fn of(similarity: f64) -> Self {
        if similarity >= 0.7 {
            SimilarityTier::High
        } else if similarity >= 0.4 {
            SimilarityTier::Medium
        } else {
            SimilarityTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimilarityTier::High => "high",
            SimilarityTier::Medium => "medium",
            SimilarityTier::Low => "low",
        }
    }

    /// Coloured badge for terminal output
    pub fn badge(&self) -> StyledObject<&'static str> {
        let badge = style(self.label()).bold();
        match self {
            SimilarityTier::High => badge.green(),
            SimilarityTier::Medium => badge.yellow(),
            SimilarityTier::Low => badge.red(),
        }
    }
}

/// Format a score in `[0, 1]` as a percentage with one decimal
pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Remove `<em>` markers the server puts around matched terms
pub fn strip_markup(text: &str) -> String {
    text.replace("<em>", "").replace("</em>", "")
}

/// Turn `<em>` markers into terminal emphasis
pub fn emphasize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("<em>") {
        out.push_str(&rest[..start]);
        let after = &rest[start + "<em>".len()..];
        match after.find("</em>") {
            Some(end) => {
                out.push_str(&style(&after[..end]).yellow().bold().to_string());
                rest = &after[end + "</em>".len()..];
            }
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Shorten text to at most `max` characters, appending an ellipsis when cut
pub fn truncate(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
