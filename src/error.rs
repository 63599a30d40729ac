//! Error types for the engine's fallible seams.
//!
//! Lookups never error — absence is `Option` everywhere. The only
//! operations that can fail are decoding a raw batch and serializing a
//! snapshot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to decode ingestion batch: {0}")]
    BatchDecode(#[from] serde_json::Error),

    #[error("Failed to serialize snapshot for key '{key}': {message}")]
    SnapshotEncode { key: String, message: String },
}
