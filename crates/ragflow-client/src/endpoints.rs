//! Paths of the RAGFlow HTTP API, relative to the server base URL

pub const HEALTH: &str = "/api/v1/system/health";
pub const DATASETS: &str = "/api/v1/datasets";
pub const RETRIEVAL: &str = "/api/v1/retrieval";

pub fn knowledge_graph(dataset_id: &str) -> String {
    format!("{}/{}/knowledge_graph", DATASETS, dataset_id)
}

pub fn chat_sessions(assistant_id: &str) -> String {
    format!("/api/v1/chats/{}/sessions", assistant_id)
}

pub fn session_completions(assistant_id: &str, session_id: &str) -> String {
    format!("{}/{}/completions", chat_sessions(assistant_id), session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_paths() {
        assert_eq!(knowledge_graph("ds1"), "/api/v1/datasets/ds1/knowledge_graph");
        assert_eq!(chat_sessions("a1"), "/api/v1/chats/a1/sessions");
        assert_eq!(session_completions("a1", "s9"), "/api/v1/chats/a1/sessions/s9/completions");
    }
}
