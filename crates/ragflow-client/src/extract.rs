//! Typed extraction from raw RAGFlow responses

use ragflow_core::models::Chunk;
use ragflow_core::{ApiError, Envelope};
use serde_json::Value;

/// Extract the chunks of a retrieval response
///
/// Fails when `code != 0`. A missing `data.chunks` array yields an empty
/// list. Server order is preserved.
pub fn extract_chunks(response: &Value) -> Result<Vec<Chunk>, ApiError> {
    let data = Envelope::decode(response).into_result()?;

    let chunks = match data.get("chunks") {
        Some(Value::Array(elements)) => elements.iter().map(Chunk::from_value).collect(),
        _ => Vec::new(),
    };

    Ok(chunks)
}

/// Answer text of a chat completion response, empty when absent
pub fn extract_answer(response: &Value) -> String {
    response
        .get("data")
        .and_then(|data| data.get("answer"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// The `mind_map` member of a knowledge-graph payload
pub fn extract_mind_map(knowledge_graph: &Value) -> Option<Value> {
    match knowledge_graph.get("mind_map") {
        None | Some(Value::Null) => None,
        Some(mind_map) => Some(mind_map.clone()),
    }
}
