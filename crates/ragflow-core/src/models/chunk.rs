use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document name used when a chunk carries no `document_keyword`
pub const UNKNOWN_DOCUMENT: &str = "Unknown";

/// A retrieved text fragment with its relevance scores
///
/// Built from exactly one element of a retrieval response's `data.chunks`
/// array and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Raw fragment text
    pub content: String,

    /// Text with query terms emphasised by the server, when requested
    pub highlight: Option<String>,

    /// Blended similarity score
    pub similarity: f64,

    /// Embedding-based similarity score
    pub vector_similarity: f64,

    /// Lexical similarity score
    pub term_similarity: f64,

    pub document_id: String,

    pub document_name: String,

    pub chunk_id: String,
}

impl Chunk {
    /// Decode one response element, substituting defaults for missing fields
    ///
    /// Scores default to `0.0`, the document name to [`UNKNOWN_DOCUMENT`] and
    /// every other string to `""`. Scores are not range-checked.
    pub fn from_value(value: &Value) -> Self {
        Self {
            content: string_field(value, "content").unwrap_or_default(),
            highlight: string_field(value, "highlight"),
            similarity: score_field(value, "similarity"),
            vector_similarity: score_field(value, "vector_similarity"),
            term_similarity: score_field(value, "term_similarity"),
            document_id: string_field(value, "document_id").unwrap_or_default(),
            document_name: string_field(value, "document_keyword")
                .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string()),
            chunk_id: string_field(value, "id").unwrap_or_default(),
        }
    }

    /// Text to show: the highlight when enabled and present, otherwise the content
    pub fn display_text(&self, use_highlight: bool) -> &str {
        match (&self.highlight, use_highlight) {
            (Some(highlight), true) if !highlight.is_empty() => highlight,
            _ => &self.content,
        }
    }

    /// Length of the raw content in characters
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn score_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_chunk() {
        let chunk = Chunk::from_value(&json!({
            "content": "Rust ownership rules",
            "highlight": "<em>Rust</em> ownership rules",
            "similarity": 0.82,
            "vector_similarity": 0.9,
            "term_similarity": 0.61,
            "document_id": "doc-1",
            "document_keyword": "book.pdf",
            "id": "chunk-7"
        }));

        assert_eq!(chunk.content, "Rust ownership rules");
        assert_eq!(chunk.highlight.as_deref(), Some("<em>Rust</em> ownership rules"));
        assert_eq!(chunk.similarity, 0.82);
        assert_eq!(chunk.vector_similarity, 0.9);
        assert_eq!(chunk.term_similarity, 0.61);
        assert_eq!(chunk.document_id, "doc-1");
        assert_eq!(chunk.document_name, "book.pdf");
        assert_eq!(chunk.chunk_id, "chunk-7");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let chunk = Chunk::from_value(&json!({}));

        assert_eq!(chunk.content, "");
        assert_eq!(chunk.highlight, None);
        assert_eq!(chunk.similarity, 0.0);
        assert_eq!(chunk.vector_similarity, 0.0);
        assert_eq!(chunk.term_similarity, 0.0);
        assert_eq!(chunk.document_id, "");
        assert_eq!(chunk.document_name, "Unknown");
        assert_eq!(chunk.chunk_id, "");
    }

    #[test]
    fn test_null_highlight_is_absent() {
        let chunk = Chunk::from_value(&json!({"content": "x", "highlight": null}));
        assert_eq!(chunk.highlight, None);
    }

    #[test]
    fn test_integer_scores_are_accepted() {
        let chunk = Chunk::from_value(&json!({"similarity": 1, "term_similarity": 0}));
        assert_eq!(chunk.similarity, 1.0);
        assert_eq!(chunk.term_similarity, 0.0);
    }

    #[test]
    fn test_scores_are_not_clamped() {
        let chunk = Chunk::from_value(&json!({"similarity": 1.7}));
        assert_eq!(chunk.similarity, 1.7);
    }

    #[test]
    fn test_display_text_prefers_highlight() {
        let chunk = Chunk::from_value(&json!({"content": "plain", "highlight": "<em>plain</em>"}));
        assert_eq!(chunk.display_text(true), "<em>plain</em>");
        assert_eq!(chunk.display_text(false), "plain");

        let bare = Chunk::from_value(&json!({"content": "plain"}));
        assert_eq!(bare.display_text(true), "plain");
    }

    #[test]
    fn test_content_length_counts_characters() {
        let chunk = Chunk::from_value(&json!({"content": "привет"}));
        assert_eq!(chunk.content_length(), 6);
    }
}
