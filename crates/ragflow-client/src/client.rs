use crate::endpoints;
use crate::extract::extract_chunks;
use crate::http::ReqwestTransport;
use crate::ports::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use ragflow_core::models::{Chunk, ConnectionConfig, RetrievalRequest, SearchOptions};
use ragflow_core::{ApiError, Envelope};
use serde_json::{json, Map, Value};

/// Blocking client for one RAGFlow server
///
/// Holds nothing but its connection settings and transport; every operation
/// issues its own request(s) and returns once a response or failure arrives.
pub struct RagflowClient<T = ReqwestTransport> {
    config: ConnectionConfig,
    transport: T,
}

impl RagflowClient<ReqwestTransport> {
    /// Create a client backed by `reqwest`
    pub fn new(config: ConnectionConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout())
            .map_err(|e| ApiError::connection(e.to_string()))?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> RagflowClient<T> {
    /// Create a client over an arbitrary transport
    pub fn with_transport(config: ConnectionConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Probe the server; `true` only for an HTTP 200
    ///
    /// Never fails: transport errors are reported as `false`.
    pub fn health_check(&self) -> bool {
        let request = self.prepare(Method::Get, endpoints::HEALTH, None);

        match self.transport.send(request) {
            Ok(response) => {
                tracing::debug!("Health check answered with status {}", response.status);
                response.status == 200
            }
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }

    /// List every dataset visible to the API key, as raw records
    pub fn list_datasets(&self) -> Result<Vec<Value>, ApiError> {
        let body = self
            .call(Method::Get, endpoints::DATASETS, None)
            .map_err(|e| ApiError::connection(e.to_string()))?;

        match Envelope::decode(&body).into_result()? {
            Value::Array(records) => Ok(records),
            Value::Null => Ok(Vec::new()),
            other => Err(ApiError::new(format!(
                "Unexpected response: expected a dataset list, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Run a retrieval query and return the raw response
    ///
    /// The response `code` is not inspected here; pass the result to
    /// [`extract_chunks`] for that.
    pub fn retrieve_chunks(&self, request: &RetrievalRequest) -> Result<Value, ApiError> {
        if request.dataset_ids.is_empty() {
            return Err(ApiError::new("At least one dataset id is required for retrieval"));
        }

        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::request_failed(format!("Failed to encode request: {}", e)))?;

        self.call(Method::Post, endpoints::RETRIEVAL, Some(body))
            .map_err(|e| ApiError::request_failed(e.to_string()))
    }

    /// Retrieve a single page of exactly `top_k` chunks
    pub fn search<S: AsRef<str>>(
        &self,
        question: &str,
        dataset_ids: &[S],
        top_k: usize,
        similarity_threshold: f64,
        options: SearchOptions,
    ) -> Result<Vec<Chunk>, ApiError> {
        let request = RetrievalRequest::new(question, dataset_ids.iter().map(|id| id.as_ref()))
            .with_top_k(top_k)
            .with_page(1, top_k)
            .with_similarity_threshold(similarity_threshold);
        let request = options.apply(request);

        let response = self.retrieve_chunks(&request)?;
        let chunks = extract_chunks(&response)?;

        tracing::debug!("Search '{}' returned {} chunks", question, chunks.len());
        Ok(chunks)
    }

    /// Fetch the knowledge graph of a dataset (the `data` payload)
    pub fn get_mind_map(&self, dataset_id: &str) -> Result<Value, ApiError> {
        let body = self
            .call(Method::Get, &endpoints::knowledge_graph(dataset_id), None)
            .map_err(|e| ApiError::connection(e.to_string()))?;

        match Envelope::decode(&body).into_result()? {
            Value::Null => Ok(Value::Object(Map::new())),
            graph => Ok(graph),
        }
    }

    /// Ask a chat assistant for an answer, opening a session when none is given
    ///
    /// Returns the raw completion response. A failed session creation
    /// stops before the completion request is sent.
    pub fn get_ai_summary(
        &self,
        assistant_id: &str,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        let session_id = self.ensure_session(assistant_id, session_id)?;
        self.complete(assistant_id, &session_id, question)
    }

    fn ensure_session(&self, assistant_id: &str, session_id: Option<&str>) -> Result<String, ApiError> {
        match session_id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(id.to_string()),
            None => self.create_session(assistant_id),
        }
    }

    fn create_session(&self, assistant_id: &str) -> Result<String, ApiError> {
        let body = self
            .call(Method::Post, &endpoints::chat_sessions(assistant_id), Some(json!({})))
            .map_err(|e| ApiError::request_failed(e.to_string()))?;

        let data = Envelope::decode(&body).into_result()?;
        let session_id = data
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::new("Unexpected response: session creation returned no session id"))?;

        tracing::debug!("Created chat session {} for assistant {}", session_id, assistant_id);
        Ok(session_id.to_string())
    }

    fn complete(&self, assistant_id: &str, session_id: &str, question: &str) -> Result<Value, ApiError> {
        let payload = json!({
            "question": question,
            "stream": false,
        });

        self.call(
            Method::Post,
            &endpoints::session_completions(assistant_id, session_id),
            Some(payload),
        )
        .map_err(|e| ApiError::request_failed(e.to_string()))
    }

    /// Send a request, require a 2xx status and parse the JSON body
    fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, TransportError> {
        let request = self.prepare(method, path, body);
        let url = request.url.clone();

        let response = self.transport.send(request).map_err(|e| {
            tracing::warn!("{:?} {} failed: {}", method, url, e);
            e
        })?;

        require_success(&response, &url)?;
        response.json()
    }

    fn prepare(&self, method: Method, path: &str, body: Option<Value>) -> HttpRequest {
        let url = self.config.endpoint(path);
        tracing::debug!("{:?} {}", method, url);

        HttpRequest {
            method,
            url,
            headers: vec![
                ("Content-Type", "application/json".to_string()),
                ("Authorization", self.config.bearer()),
            ],
            body,
        }
    }
}

fn require_success(response: &HttpResponse, url: &str) -> Result<(), TransportError> {
    if response.is_success() {
        return Ok(());
    }

    tracing::warn!("{} answered with HTTP {}", url, response.status);
    Err(TransportError::new(format!("HTTP {} for url: {}", response.status, url)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
