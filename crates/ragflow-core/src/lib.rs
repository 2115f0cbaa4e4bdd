//! RAGFlow Core - Domain models, response envelope, and configuration
//!
//! This crate contains the typed representation of the RAGFlow HTTP contract
//! shared by the API client and the terminal front end.

pub mod config;
pub mod envelope;
pub mod error;
pub mod models;

pub use envelope::Envelope;
pub use error::{ApiError, RagflowError, Result};
