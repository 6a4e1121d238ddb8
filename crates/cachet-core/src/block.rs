//! Block: the ledger's atomic unit.
//!
//! A block is immutable once sealed. Any retroactive edit to any field is
//! detectable because `hash` covers all other fields and `previous_hash`
//! covers the whole prefix.

use serde::{Deserialize, Serialize};

use crate::canonical::block_digest;
use crate::event::Event;
use crate::hash::ChainHash;

/// One entry in the hash-linked chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// When the block was appended (Unix milliseconds).
    pub timestamp: i64,

    /// Hash of the previous block, or [`ChainHash::GENESIS`] for the first.
    pub previous_hash: ChainHash,

    /// The recorded protocol event.
    pub event: Event,

    /// Blake3 digest over {timestamp, previous_hash, event}.
    pub hash: ChainHash,
}

impl Block {
    /// Build a block, computing its hash from the other fields.
    pub fn seal(timestamp: i64, previous_hash: ChainHash, event: Event) -> Self {
        let hash = block_digest(timestamp, &previous_hash, &event);
        Self {
            timestamp,
            previous_hash,
            event,
            hash,
        }
    }

    /// Recompute the digest from this block's own fields.
    pub fn compute_hash(&self) -> ChainHash {
        block_digest(self.timestamp, &self.previous_hash, &self.event)
    }

    /// Check the stored hash against the recomputed digest.
    pub fn verify_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event::AccessRequest {
            file_id: "f1".into(),
            requester_id: "bob".into(),
        }
    }

    #[test]
    fn test_seal_produces_valid_hash() {
        let block = Block::seal(1736870400000, ChainHash::GENESIS, sample_event());
        assert!(block.verify_hash());
    }

    #[test]
    fn test_mutating_any_field_breaks_hash() {
        let block = Block::seal(1736870400000, ChainHash::GENESIS, sample_event());

        let mut tampered = block.clone();
        tampered.timestamp += 1;
        assert!(!tampered.verify_hash());

        let mut tampered = block.clone();
        tampered.previous_hash = ChainHash::from_bytes([0xff; 32]);
        assert!(!tampered.verify_hash());

        let mut tampered = block.clone();
        tampered.event = Event::AccessRequest {
            file_id: "f1".into(),
            requester_id: "mallory".into(),
        };
        assert!(!tampered.verify_hash());
    }

    #[test]
    fn test_json_roundtrip_preserves_hash() {
        let block = Block::seal(1736870400000, ChainHash::GENESIS, sample_event());

        let json = serde_json::to_string(&block).unwrap();
        let reparsed: Block = serde_json::from_str(&json).unwrap();

        assert_eq!(reparsed, block);
        assert!(reparsed.verify_hash());
    }
}
