//! RAGFlow Client - Blocking client for the RAGFlow HTTP API
//!
//! This crate defines the transport port, its `reqwest` adapter, and the
//! typed client operations built on top of them.

pub mod client;
pub mod endpoints;
pub mod extract;
pub mod http;
pub mod ports;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

// Re-export main types
pub use client::RagflowClient;
pub use extract::{extract_answer, extract_chunks, extract_mind_map};
pub use http::ReqwestTransport;
pub use ports::{HttpRequest, HttpResponse, Method, Transport, TransportError};
pub use ragflow_core::ApiError;
