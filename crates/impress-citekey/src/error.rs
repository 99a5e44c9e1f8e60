//! Error types for impress-citekey

use thiserror::Error;

use crate::record::ItemId;

/// Result type alias for cite key operations
pub type Result<T> = std::result::Result<T, CiteKeyError>;

/// Main error type for cite key operations
#[derive(Error, Debug)]
pub enum CiteKeyError {
    /// The host store failed to read or persist an item
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Listener registration attempted outside a tokio runtime
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    /// Settings or library data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by the host library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Save rejected for item {0}: {1}")]
    Rejected(ItemId, String),

    #[error("Storage error: {0}")]
    Storage(String),
}
