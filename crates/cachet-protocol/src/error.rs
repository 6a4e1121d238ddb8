//! Error types for the sharing protocol.

use thiserror::Error;

use cachet_core::CryptoError;
use cachet_ledger::LedgerError;
use cachet_store::StoreError;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// No `UPLOAD` event exists for the file.
    #[error("no upload event for file {file_id}")]
    MissingUpload { file_id: String },

    /// No `KEY_SHARE` event addressed to the requester exists for the file.
    #[error("key for file {file_id} not shared to {requester_id}")]
    NotShared {
        file_id: String,
        requester_id: String,
    },

    /// Envelope-crypto failure (authentication, signature, or unwrap).
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Ledger failure.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Blob store or keystore failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
