//! Steps 2 and 3: access request and key share.

use tracing::info;

use cachet_core::{ChainHash, ContentKey, Event, WrapPublicKey, WrappedKey};
use cachet_ledger::Ledger;

use crate::error::Result;

/// Append an `ACCESS_REQUEST` event naming the file and requester.
///
/// Purely advisory: nothing requires an owner to see or approve a request
/// before sharing, and a key can be shared to a requester that never asked.
pub fn create_access_request(
    ledger: &dyn Ledger,
    requester_id: &str,
    file_id: &str,
) -> Result<ChainHash> {
    let hash = ledger.append(Event::AccessRequest {
        file_id: file_id.to_string(),
        requester_id: requester_id.to_string(),
    })?;

    info!(requester_id, file_id, "recorded access request");
    Ok(hash)
}

/// Wrap the file's content key under the requester's public key and append
/// the `KEY_SHARE` event.
///
/// The owner must have retained the content key from the upload; the ledger
/// never stores it unwrapped. Identity strings are self-asserted: the
/// ledger does not bind `owner_id` to the uploader, and only the ciphertext
/// carries a signature.
pub fn approve_and_share_key(
    ledger: &dyn Ledger,
    owner_id: &str,
    file_id: &str,
    requester_id: &str,
    requester_public: &WrapPublicKey,
    content_key: &ContentKey,
) -> Result<WrappedKey> {
    let wrapped_key = requester_public.wrap_key(content_key.as_bytes())?;

    ledger.append(Event::KeyShare {
        file_id: file_id.to_string(),
        owner_id: owner_id.to_string(),
        requester_id: requester_id.to_string(),
        wrapped_key: wrapped_key.clone(),
    })?;

    info!(owner_id, requester_id, file_id, "shared wrapped key");
    Ok(wrapped_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachet_core::WrapKeypair;
    use cachet_ledger::MemoryLedger;

    #[test]
    fn test_access_request_appends_event() {
        let ledger = MemoryLedger::new();

        create_access_request(&ledger, "bob", "f1").unwrap();

        let chain = ledger.read_all().unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(
            chain[0].event,
            Event::AccessRequest {
                file_id: "f1".into(),
                requester_id: "bob".into(),
            }
        );
    }

    #[test]
    fn test_share_key_wraps_for_requester() {
        let ledger = MemoryLedger::new();
        let bob = WrapKeypair::generate();
        let content_key = ContentKey::generate();

        let wrapped =
            approve_and_share_key(&ledger, "alice", "f1", "bob", &bob.public_key(), &content_key)
                .unwrap();

        // Bob can recover the key; the ledger carries only the wrapped form.
        let unwrapped = bob.unwrap_key(&wrapped).unwrap();
        assert_eq!(unwrapped, content_key.as_bytes());

        let chain = ledger.read_all().unwrap();
        match &chain[0].event {
            Event::KeyShare {
                wrapped_key,
                owner_id,
                requester_id,
                ..
            } => {
                assert_eq!(wrapped_key, &wrapped);
                assert_eq!(owner_id, "alice");
                assert_eq!(requester_id, "bob");
            }
            other => panic!("expected KEY_SHARE, got {}", other.type_name()),
        }
    }
}
