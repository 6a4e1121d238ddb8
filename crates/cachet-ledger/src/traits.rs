//! Ledger trait: the abstract interface for the shared event log.
//!
//! All backends expose the same three operations so the protocol layer is
//! medium-agnostic. Implementations here are the file-backed hash chain
//! ([`crate::LocalLedger`]) and an in-memory twin ([`crate::MemoryLedger`]);
//! a backend whose integrity is guaranteed by external consensus would
//! conform by returning `Ok(true)` unconditionally from `verify_integrity`.

use cachet_core::{Block, ChainHash, Event};

use crate::error::Result;

/// An append-only, totally ordered event log shared by every participant.
///
/// # Design Notes
///
/// - **Append-only**: no event is ever reordered or deleted; the total
///   order of blocks is the only ordering guarantee.
/// - **Serialized appends**: a backend must ensure that no two concurrent
///   appenders observe the same tail and both succeed; an append-append
///   race would fork the chain.
/// - **Unlocked reads**: a reader may observe an older-but-valid prefix,
///   never a half-written block.
/// - **No silent recovery**: integrity failures and unparseable media are
///   reported, never repaired or discarded.
pub trait Ledger: Send + Sync {
    /// Append an event, returning the hash of the new block.
    fn append(&self, event: Event) -> Result<ChainHash>;

    /// Return the full chain snapshot.
    fn read_all(&self) -> Result<Vec<Block>>;

    /// Walk the chain from genesis, checking every link and digest.
    ///
    /// Returns `Ok(false)` on the first mismatch; no partial repair is
    /// attempted. The scan is O(n) and inherently sequential: each block's
    /// hash depends on its predecessor's.
    fn verify_integrity(&self) -> Result<bool>;
}

/// Verify a chain snapshot in memory.
///
/// Shared by backends that hold the real blocks locally.
pub(crate) fn verify_chain(chain: &[Block]) -> bool {
    let mut prev = ChainHash::GENESIS;
    for (index, block) in chain.iter().enumerate() {
        if block.previous_hash != prev {
            tracing::warn!(index, "chain link mismatch");
            return false;
        }
        if !block.verify_hash() {
            tracing::warn!(index, "block digest mismatch");
            return false;
        }
        prev = block.hash;
    }
    true
}
