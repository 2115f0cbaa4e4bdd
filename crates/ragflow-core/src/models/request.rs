use serde::Serialize;

/// Body of a `POST /api/v1/retrieval` call
///
/// Serializes directly to the wire format. `document_ids` is omitted when
/// empty and `rerank_id` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalRequest {
    pub question: String,

    /// Datasets to search; must not be empty
    pub dataset_ids: Vec<String>,

    /// Restrict the search to these documents
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub document_ids: Vec<String>,

    /// Minimum similarity for a chunk to be returned
    pub similarity_threshold: f64,

    /// Blend between vector and term similarity
    pub vector_similarity_weight: f64,

    /// Number of candidates considered by the vector search
    pub top_k: usize,

    pub page: usize,

    pub page_size: usize,

    pub highlight: bool,

    pub keyword: bool,

    /// Use the dataset knowledge graph during retrieval
    pub use_kg: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_id: Option<String>,
}

impl RetrievalRequest {
    pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.2;
    pub const DEFAULT_VECTOR_SIMILARITY_WEIGHT: f64 = 0.3;
    pub const DEFAULT_TOP_K: usize = 10;
    pub const DEFAULT_PAGE_SIZE: usize = 30;

    /// Create a request with default scoring and paging parameters
    pub fn new(
        question: impl Into<String>,
        dataset_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            question: question.into(),
            dataset_ids: dataset_ids.into_iter().map(Into::into).collect(),
            document_ids: Vec::new(),
            similarity_threshold: Self::DEFAULT_SIMILARITY_THRESHOLD,
            vector_similarity_weight: Self::DEFAULT_VECTOR_SIMILARITY_WEIGHT,
            top_k: Self::DEFAULT_TOP_K,
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
            highlight: true,
            keyword: false,
            use_kg: false,
            rerank_id: None,
        }
    }

    pub fn with_document_ids(mut self, document_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.document_ids = document_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_vector_similarity_weight(mut self, weight: f64) -> Self {
        self.vector_similarity_weight = weight;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Select a single page of `page_size` results
    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_keyword(mut self, keyword: bool) -> Self {
        self.keyword = keyword;
        self
    }

    pub fn with_knowledge_graph(mut self, use_kg: bool) -> Self {
        self.use_kg = use_kg;
        self
    }

    /// Set the rerank model; an empty id counts as unset
    pub fn with_rerank_id(mut self, rerank_id: Option<String>) -> Self {
        self.rerank_id = rerank_id.filter(|id| !id.is_empty());
        self
    }
}

/// Optional named parameters passed through by the `search` shortcut
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub document_ids: Vec<String>,
    pub vector_similarity_weight: Option<f64>,
    pub highlight: Option<bool>,
    pub keyword: Option<bool>,
    pub use_kg: Option<bool>,
    pub rerank_id: Option<String>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(mut self, document_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.document_ids = document_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn vector_similarity_weight(mut self, weight: f64) -> Self {
        self.vector_similarity_weight = Some(weight);
        self
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn keyword(mut self, keyword: bool) -> Self {
        self.keyword = Some(keyword);
        self
    }

    pub fn knowledge_graph(mut self, use_kg: bool) -> Self {
        self.use_kg = Some(use_kg);
        self
    }

    pub fn rerank(mut self, rerank_id: impl Into<String>) -> Self {
        self.rerank_id = Some(rerank_id.into());
        self
    }

    /// Overlay the set options onto a request; unset options keep its values
    pub fn apply(self, mut request: RetrievalRequest) -> RetrievalRequest {
        if !self.document_ids.is_empty() {
            request.document_ids = self.document_ids;
        }
        if let Some(weight) = self.vector_similarity_weight {
            request.vector_similarity_weight = weight;
        }
        if let Some(highlight) = self.highlight {
            request.highlight = highlight;
        }
        if let Some(keyword) = self.keyword {
            request.keyword = keyword;
        }
        if let Some(use_kg) = self.use_kg {
            request.use_kg = use_kg;
        }
        request.with_rerank_id(self.rerank_id)
    }
}
