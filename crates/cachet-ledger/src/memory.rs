//! In-memory ledger backend.
//!
//! Same hash-chain semantics as the file-backed ledger with no persistence.
//! Used by tests and by embedders that replay a chain without a shared
//! medium. Thread-safe: the interior mutex serializes appends.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use cachet_core::{Block, ChainHash, Event};

use crate::error::Result;
use crate::traits::{verify_chain, Ledger};

/// A ledger held entirely in memory.
#[derive(Default)]
pub struct MemoryLedger {
    chain: Mutex<Vec<Block>>,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ledger for MemoryLedger {
    fn append(&self, event: Event) -> Result<ChainHash> {
        let mut chain = self.chain.lock().unwrap();
        let previous_hash = chain.last().map(|b| b.hash).unwrap_or(ChainHash::GENESIS);

        let block = Block::seal(now_millis(), previous_hash, event);
        let hash = block.hash;
        chain.push(block);
        Ok(hash)
    }

    fn read_all(&self) -> Result<Vec<Block>> {
        Ok(self.chain.lock().unwrap().clone())
    }

    fn verify_integrity(&self) -> Result<bool> {
        Ok(verify_chain(&self.chain.lock().unwrap()))
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
