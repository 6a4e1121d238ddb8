//! Share-state replay.
//!
//! The lifecycle of a `(file_id, requester_id)` pair is computed by
//! replaying the chain, not stored anywhere: the ledger is the only state.
//! Downloads are local reads and never appear on the ledger, so there is no
//! downloaded state here.

use cachet_core::{Block, Event};

/// Lifecycle of one `(file_id, requester_id)` pair.
///
/// `Requested` is bypassable: an owner may share without a prior request.
/// `Shared` recurs: each further `KEY_SHARE` for the pair bumps the count
/// and the most recent share is the one a download uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareState {
    /// No upload recorded for the file.
    None,
    /// The file is uploaded; this requester has no recorded interaction.
    Uploaded,
    /// The requester has asked for access.
    Requested,
    /// A key has been shared to the requester.
    Shared {
        /// How many `KEY_SHARE` events address the pair.
        shares: u32,
    },
}

impl ShareState {
    /// Whether a download by this requester could find a key.
    pub fn is_shared(&self) -> bool {
        matches!(self, ShareState::Shared { .. })
    }
}

/// Replay the chain into the state of one `(file_id, requester_id)` pair.
pub fn share_state(blocks: &[Block], file_id: &str, requester_id: &str) -> ShareState {
    let mut state = ShareState::None;

    for event in blocks.iter().map(|block| &block.event) {
        match event {
            Event::Upload { file_id: f, .. } if f == file_id => {
                if state == ShareState::None {
                    state = ShareState::Uploaded;
                }
            }
            Event::AccessRequest {
                file_id: f,
                requester_id: r,
            } if f == file_id && r == requester_id => {
                if state == ShareState::Uploaded {
                    state = ShareState::Requested;
                }
            }
            Event::KeyShare {
                file_id: f,
                requester_id: r,
                ..
            } if f == file_id && r == requester_id => {
                state = match state {
                    ShareState::Shared { shares } => ShareState::Shared { shares: shares + 1 },
                    _ => ShareState::Shared { shares: 1 },
                };
            }
            _ => {}
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachet_core::{ContentKey, SigningKeypair, WrapKeypair};
    use cachet_ledger::{Ledger, MemoryLedger};
    use cachet_store::MemoryBlobStore;

    use crate::sharing::{approve_and_share_key, create_access_request};
    use crate::upload::encrypt_sign_upload;

    #[test]
    fn test_state_progression() {
        let ledger = MemoryLedger::new();
        let blobs = MemoryBlobStore::new();
        let alice = SigningKeypair::generate();
        let bob = WrapKeypair::generate();

        let blocks = ledger.read_all().unwrap();
        assert_eq!(share_state(&blocks, "f1", "bob"), ShareState::None);

        let upload =
            encrypt_sign_upload(&ledger, &blobs, &alice, "alice", "r.txt", b"v1").unwrap();
        let blocks = ledger.read_all().unwrap();
        assert_eq!(
            share_state(&blocks, &upload.file_id, "bob"),
            ShareState::Uploaded
        );

        create_access_request(&ledger, "bob", &upload.file_id).unwrap();
        let blocks = ledger.read_all().unwrap();
        assert_eq!(
            share_state(&blocks, &upload.file_id, "bob"),
            ShareState::Requested
        );

        approve_and_share_key(
            &ledger,
            "alice",
            &upload.file_id,
            "bob",
            &bob.public_key(),
            &upload.content_key,
        )
        .unwrap();
        let blocks = ledger.read_all().unwrap();
        assert_eq!(
            share_state(&blocks, &upload.file_id, "bob"),
            ShareState::Shared { shares: 1 }
        );
    }

    #[test]
    fn test_request_is_bypassable_and_shares_recur() {
        let ledger = MemoryLedger::new();
        let blobs = MemoryBlobStore::new();
        let alice = SigningKeypair::generate();
        let bob = WrapKeypair::generate();

        let upload =
            encrypt_sign_upload(&ledger, &blobs, &alice, "alice", "r.txt", b"v1").unwrap();

        // Share twice without any request.
        for _ in 0..2 {
            approve_and_share_key(
                &ledger,
                "alice",
                &upload.file_id,
                "bob",
                &bob.public_key(),
                &ContentKey::generate(),
            )
            .unwrap();
        }

        let blocks = ledger.read_all().unwrap();
        let state = share_state(&blocks, &upload.file_id, "bob");
        assert_eq!(state, ShareState::Shared { shares: 2 });
        assert!(state.is_shared());
    }

    #[test]
    fn test_states_are_per_pair() {
        let ledger = MemoryLedger::new();
        let blobs = MemoryBlobStore::new();
        let alice = SigningKeypair::generate();
        let bob = WrapKeypair::generate();

        let upload =
            encrypt_sign_upload(&ledger, &blobs, &alice, "alice", "r.txt", b"v1").unwrap();
        approve_and_share_key(
            &ledger,
            "alice",
            &upload.file_id,
            "bob",
            &bob.public_key(),
            &upload.content_key,
        )
        .unwrap();

        let blocks = ledger.read_all().unwrap();
        assert!(share_state(&blocks, &upload.file_id, "bob").is_shared());
        assert_eq!(
            share_state(&blocks, &upload.file_id, "carol"),
            ShareState::Uploaded
        );
    }
}
