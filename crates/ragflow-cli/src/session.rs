//! Search session state shared by the `search` and `interactive` commands

use ragflow_client::{extract_answer, extract_mind_map, ApiError, RagflowClient, ReqwestTransport, Transport};
use ragflow_core::config::LayeredConfig;
use ragflow_core::Envelope;
use ragflow_core::models::{Chunk, ConnectionConfig, Dataset, SearchOptions};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not connected to a RAGFlow server")]
    NotConnected,

    #[error("No dataset selected")]
    NoDatasetSelected,

    #[error("Query is empty")]
    EmptyQuery,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Tunable parameters applied to every search of a session
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub top_k: usize,
    pub similarity_threshold: f64,
    pub vector_similarity_weight: f64,
    pub highlight: bool,
    pub keyword: bool,
    pub use_kg: bool,
    pub rerank_id: Option<String>,
    pub document_ids: Vec<String>,
    /// Chat assistant asked for a summary after each retrieval
    pub assistant_id: Option<String>,
    /// Fetch the mind map of the first selected dataset after each retrieval
    pub mind_map: bool,
}

impl SearchSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            top_k: config.top_k.value,
            similarity_threshold: config.similarity_threshold.value,
            vector_similarity_weight: config.vector_similarity_weight.value,
            highlight: config.highlight.value,
            keyword: config.keyword.value,
            use_kg: false,
            rerank_id: None,
            document_ids: Vec::new(),
            assistant_id: None,
            mind_map: false,
        }
    }

    /// Retrieval options derived from these settings
    pub fn options(&self) -> SearchOptions {
        let mut options = SearchOptions::new()
            .documents(self.document_ids.iter().cloned())
            .vector_similarity_weight(self.vector_similarity_weight)
            .highlight(self.highlight)
            .keyword(self.keyword)
            .knowledge_graph(self.use_kg);

        if let Some(rerank_id) = self.rerank_id.as_deref().filter(|id| !id.is_empty()) {
            options = options.rerank(rerank_id);
        }
        options
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&LayeredConfig::with_defaults())
    }
}

/// Everything one successful search produced
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub query: String,
    pub chunks: Vec<Chunk>,
    /// Assistant answer; `None` when no assistant is configured
    pub ai_summary: Option<String>,
    /// `mind_map` field of the knowledge graph; `None` when disabled or absent
    pub mind_map: Option<Value>,
}

/// A connection, the selected datasets and the results of the last search
pub struct SearchSession<T: Transport = ReqwestTransport> {
    client: Option<RagflowClient<T>>,
    datasets: Vec<Dataset>,
    selected: Vec<String>,
    pub settings: SearchSettings,
    last: Option<SearchOutcome>,
}

impl SearchSession<ReqwestTransport> {
    /// Connect over HTTP with the given settings
    pub fn connect(&mut self, config: ConnectionConfig) -> Result<&[Dataset], SessionError> {
        let client = RagflowClient::new(config)?;
        self.connect_with(client)
    }
}

impl<T: Transport> SearchSession<T> {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            client: None,
            datasets: Vec::new(),
            selected: Vec::new(),
            settings,
            last: None,
        }
    }

    /// Adopt `client` once it has listed the datasets
    ///
    /// On failure the session keeps its previous connection, if any.
    pub fn connect_with(&mut self, client: RagflowClient<T>) -> Result<&[Dataset], SessionError> {
        let records = client.list_datasets()?;
        let datasets = Dataset::from_records(&records);
        tracing::debug!("Connected to {} ({} datasets)", client.config().base_url(), datasets.len());

        self.client = Some(client);
        self.datasets = datasets;
        self.selected.retain(|id| self.datasets.iter().any(|d| &d.id == id));
        Ok(&self.datasets)
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&RagflowClient<T>> {
        self.client.as_ref()
    }

    /// Datasets listed at connect time
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Replace the dataset selection
    pub fn select(&mut self, dataset_ids: impl IntoIterator<Item = impl Into<String>>) {
        self.selected = dataset_ids.into_iter().map(Into::into).collect();
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Results of the last successful search
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last.as_ref()
    }

    /// Run retrieval, then the optional summary and mind map
    ///
    /// The stored outcome is replaced only when every step succeeds.
    pub fn search(&mut self, query: &str) -> Result<&SearchOutcome, SessionError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        let client = self.client.as_ref().ok_or(SessionError::NotConnected)?;
        if self.selected.is_empty() {
            return Err(SessionError::NoDatasetSelected);
        }

        let settings = &self.settings;
        let chunks = client.search(
            query,
            &self.selected,
            settings.top_k,
            settings.similarity_threshold,
            settings.options(),
        )?;

        let ai_summary = match settings.assistant_id.as_deref().filter(|id| !id.is_empty()) {
            Some(assistant_id) => {
                let response = client.get_ai_summary(assistant_id, query, None)?;
                Envelope::decode(&response).into_result()?;
                Some(extract_answer(&response))
            }
            None => None,
        };

        let mind_map = if settings.mind_map {
            let graph = client.get_mind_map(&self.selected[0])?;
            extract_mind_map(&graph)
        } else {
            None
        };

        let outcome = self.last.insert(SearchOutcome {
            query: query.to_string(),
            chunks,
            ai_summary,
            mind_map,
        });
        Ok(&*outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragflow_client::mock::ScriptedTransport;
    use serde_json::json;

    fn client(transport: ScriptedTransport) -> RagflowClient<ScriptedTransport> {
        RagflowClient::with_transport(ConnectionConfig::new("http://kb:9380", "key"), transport)
    }

    fn datasets_response() -> Value {
        json!({"code": 0, "data": [{"id": "ds1", "name": "Handbook"}, {"id": "ds2"}]})
    }

    fn chunks_response(content: &str) -> Value {
        json!({"code": 0, "data": {"chunks": [
            {"id": "c1", "content": content, "similarity": 0.8, "document_keyword": "a.pdf"}
        ]}})
    }

    /// A session connected through a script that starts with the dataset listing
    fn connected(
        script: impl FnOnce(ScriptedTransport) -> ScriptedTransport,
    ) -> SearchSession<ScriptedTransport> {
        let transport = script(ScriptedTransport::new().respond_json(200, datasets_response()));
        let mut session = SearchSession::new(SearchSettings::default());
        session.connect_with(client(transport)).unwrap();
        session.select(["ds1"]);
        session
    }

    #[test]
    fn test_connect_stores_datasets() {
        let mut session = SearchSession::new(SearchSettings::default());
        let datasets = session
            .connect_with(client(ScriptedTransport::new().respond_json(200, datasets_response())))
            .unwrap();

        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[1].name, "ds2");
        assert!(session.is_connected());
    }

    #[test]
    fn test_failed_connect_leaves_session_disconnected() {
        let mut session = SearchSession::new(SearchSettings::default());
        let err = session
            .connect_with(client(ScriptedTransport::new().respond_json(200, json!({"code": 109, "message": "Authentication error"}))))
            .unwrap_err();

        assert_eq!(err.to_string(), "API Error: Authentication error");
        assert!(!session.is_connected());
        assert!(session.datasets().is_empty());
    }

    #[test]
    fn test_search_requires_connection_and_selection() {
        let mut session: SearchSession<ScriptedTransport> = SearchSession::new(SearchSettings::default());
        assert!(matches!(session.search("q"), Err(SessionError::NotConnected)));

        let mut session = connected(|t| t);
        session.select(Vec::<String>::new());
        assert!(matches!(session.search("q"), Err(SessionError::NoDatasetSelected)));
        assert!(matches!(session.search("   "), Err(SessionError::EmptyQuery)));
    }

    #[test]
    fn test_search_retrieval_only() {
        let mut session = connected(|t| t.respond_json(200, chunks_response("first")));

        let outcome = session.search("ownership").unwrap();
        assert_eq!(outcome.query, "ownership");
        assert_eq!(outcome.chunks.len(), 1);
        assert_eq!(outcome.ai_summary, None);
        assert_eq!(outcome.mind_map, None);

        // datasets + retrieval
        assert_eq!(session.client().unwrap().transport().requests().len(), 2);
    }

    #[test]
    fn test_search_runs_summary_then_mind_map() {
        let mut session = connected(|t| {
            t.respond_json(200, chunks_response("first"))
                .respond_json(200, json!({"code": 0, "data": {"id": "s1"}}))
                .respond_json(200, json!({"code": 0, "data": {"answer": "Summary"}}))
                .respond_json(200, json!({"code": 0, "data": {"mind_map": {"id": "root"}}}))
        });
        session.select(["ds2", "ds1"]);
        session.settings.assistant_id = Some("a1".to_string());
        session.settings.mind_map = true;

        let outcome = session.search("q").unwrap().clone();
        assert_eq!(outcome.ai_summary.as_deref(), Some("Summary"));
        assert_eq!(outcome.mind_map, Some(json!({"id": "root"})));

        let requests = session.client().unwrap().transport().requests();
        let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "http://kb:9380/api/v1/datasets",
                "http://kb:9380/api/v1/retrieval",
                "http://kb:9380/api/v1/chats/a1/sessions",
                "http://kb:9380/api/v1/chats/a1/sessions/s1/completions",
                "http://kb:9380/api/v1/datasets/ds2/knowledge_graph",
            ]
        );
    }

    #[test]
    fn test_failed_step_keeps_previous_results() {
        let mut session = connected(|t| {
            t.respond_json(200, chunks_response("first"))
                .respond_json(200, chunks_response("second"))
                .respond_json(200, json!({"code": 102, "message": "No authorization."}))
        });

        session.search("one").unwrap();

        session.settings.mind_map = true;
        let err = session.search("two").unwrap_err();
        assert_eq!(err.to_string(), "API Error: No authorization.");

        let last = session.last_outcome().unwrap();
        assert_eq!(last.query, "one");
        assert_eq!(last.chunks[0].content, "first");
    }

    #[test]
    fn test_rejected_summary_keeps_previous_results() {
        let mut session = connected(|t| {
            t.respond_json(200, chunks_response("first"))
                .respond_json(200, chunks_response("second"))
                .respond_json(200, json!({"code": 0, "data": {"id": "s1"}}))
                .respond_json(200, json!({"code": 102, "message": "LLM quota exceeded"}))
        });

        session.search("one").unwrap();

        session.settings.assistant_id = Some("a1".to_string());
        let err = session.search("two").unwrap_err();
        assert_eq!(err.to_string(), "API Error: LLM quota exceeded");

        let last = session.last_outcome().unwrap();
        assert_eq!(last.query, "one");
        assert_eq!(last.chunks[0].content, "first");
        assert_eq!(last.ai_summary, None);
    }

    #[test]
    fn test_settings_options_skip_empty_rerank() {
        let mut settings = SearchSettings::default();
        settings.rerank_id = Some(String::new());
        assert_eq!(settings.options().rerank_id, None);

        settings.rerank_id = Some("bge-reranker".to_string());
        settings.use_kg = true;
        let options = settings.options();
        assert_eq!(options.rerank_id.as_deref(), Some("bge-reranker"));
        assert_eq!(options.use_kg, Some(true));
        assert_eq!(options.vector_similarity_weight, Some(0.3));
    }
}
