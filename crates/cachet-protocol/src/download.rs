//! Step 4: download, unwrap, verify, decrypt.

use tracing::{debug, info};

use cachet_core::{Block, ContentKey, CryptoError, Event, SigningPublicKey, WrapKeypair};
use cachet_ledger::Ledger;
use cachet_store::BlobStore;

use crate::error::{ProtocolError, Result};

/// Find the `UPLOAD` event for a file.
///
/// First match wins; uniqueness of file ids across owners is not enforced,
/// so behavior under a collision follows the earliest upload.
pub fn find_upload<'a>(blocks: &'a [Block], file_id: &str) -> Option<&'a Event> {
    blocks
        .iter()
        .map(|block| &block.event)
        .find(|event| matches!(event, Event::Upload { file_id: f, .. } if f == file_id))
}

/// Find the most recent `KEY_SHARE` for a (file, requester) pair.
///
/// Last match wins: a later share for the same pair supersedes any earlier
/// one.
pub fn find_latest_key_share<'a>(
    blocks: &'a [Block],
    file_id: &str,
    requester_id: &str,
) -> Option<&'a Event> {
    blocks.iter().rev().map(|block| &block.event).find(|event| {
        matches!(
            event,
            Event::KeyShare { file_id: f, requester_id: r, .. } if f == file_id && r == requester_id
        )
    })
}

/// Reconstruct the plaintext of a shared file, verifying every step.
///
/// Fails with [`ProtocolError::MissingUpload`] when the file was never
/// uploaded and [`ProtocolError::NotShared`] when no key was shared to this
/// requester. The owner's signature over the ciphertext is checked before
/// decryption; plaintext is returned only when both the signature and the
/// AEAD tag verify.
pub fn download_and_verify(
    ledger: &dyn Ledger,
    blobs: &dyn BlobStore,
    requester_id: &str,
    requester_wrap: &WrapKeypair,
    owner_signing_pub: &SigningPublicKey,
    file_id: &str,
) -> Result<Vec<u8>> {
    let blocks = ledger.read_all()?;

    let Some(Event::Upload {
        aes_nonce,
        signature,
        ..
    }) = find_upload(&blocks, file_id)
    else {
        return Err(ProtocolError::MissingUpload {
            file_id: file_id.to_string(),
        });
    };

    let Some(Event::KeyShare { wrapped_key, .. }) =
        find_latest_key_share(&blocks, file_id, requester_id)
    else {
        return Err(ProtocolError::NotShared {
            file_id: file_id.to_string(),
            requester_id: requester_id.to_string(),
        });
    };

    let key_bytes = requester_wrap.unwrap_key(wrapped_key)?;
    let content_key = ContentKey::from_slice(&key_bytes)
        .map_err(|_| CryptoError::Unwrap("unwrapped key has unusable length".into()))?;

    let ciphertext = blobs.get(file_id)?;
    debug!(file_id, size = ciphertext.len(), "fetched ciphertext");

    // Authenticity first: a bad signature aborts before any decryption.
    owner_signing_pub.verify(&ciphertext, signature)?;

    let plaintext = content_key.decrypt(aes_nonce, &ciphertext, b"")?;
    info!(requester_id, file_id, "downloaded and verified file");
    Ok(plaintext)
}
