pub mod chunk;
pub mod connection;
pub mod dataset;
pub mod request;

pub use chunk::Chunk;
pub use connection::{ConnectionConfig, DEFAULT_TIMEOUT_SECS};
pub use dataset::Dataset;
pub use request::{RetrievalRequest, SearchOptions};
