//! Error types for the ledger module.

use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The persisted chain could not be parsed as a block sequence.
    ///
    /// Never silently reset: discarding an unreadable ledger would erase
    /// the audit trail.
    #[error("ledger corrupted: {0}")]
    ChainCorrupted(String),

    /// The cross-process append lock could not be acquired in time.
    #[error("could not acquire append lock on {path} within {waited_ms} ms")]
    LockTimeout { path: String, waited_ms: u64 },

    /// The medium is unreadable or unwritable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A block failed to serialize for persistence.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
