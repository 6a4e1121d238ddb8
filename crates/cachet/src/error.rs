//! Error type for the facade.

use thiserror::Error;

use cachet_ledger::LedgerError;
use cachet_protocol::ProtocolError;
use cachet_store::StoreError;

/// Errors surfaced by [`crate::Vault`] operations.
///
/// Everything is propagated unmodified from the layer that produced it; the
/// facade performs no retries and no recovery.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, VaultError>;
