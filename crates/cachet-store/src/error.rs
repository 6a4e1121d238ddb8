//! Error types for the store collaborators.

use thiserror::Error;

/// Errors that can occur in blob storage or the keystore.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No blob stored under the given file id.
    #[error("no blob stored for file {0}")]
    MissingBlob(String),

    /// No persisted keys for the given identity.
    #[error("no keys stored for identity {0}")]
    MissingKeys(String),

    /// An identity string that cannot name a key directory.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// Persisted key material failed to parse.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Metadata failed to serialize or parse.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
