//! Step 1: encrypt, sign, upload, and record.

use tracing::info;
use uuid::Uuid;

use cachet_core::{seal, ContentKey, ContentNonce, Event, Signature, SigningKeypair};
use cachet_ledger::Ledger;
use cachet_store::BlobStore;

use crate::error::Result;

/// What the owner holds after a successful upload.
///
/// The content key exists only here; it is never written to the ledger.
/// The owner must retain it to share access later.
pub struct UploadOutcome {
    /// The freshly generated file id.
    pub file_id: String,
    /// The per-upload symmetric key, returned to the caller.
    pub content_key: ContentKey,
    /// The AEAD nonce bound to this ciphertext.
    pub nonce: ContentNonce,
    /// The owner's signature over the ciphertext.
    pub signature: Signature,
    /// Ciphertext size in bytes.
    pub ciphertext_size: u64,
}

/// Encrypt `plaintext`, sign the ciphertext, store it, and append the
/// `UPLOAD` event.
///
/// The signature covers the ciphertext, not the plaintext, so any party can
/// verify authenticity without decrypting first.
pub fn encrypt_sign_upload(
    ledger: &dyn Ledger,
    blobs: &dyn BlobStore,
    owner_signing: &SigningKeypair,
    owner_id: &str,
    filename: &str,
    plaintext: &[u8],
) -> Result<UploadOutcome> {
    let (content_key, nonce, ciphertext) = seal(plaintext, b"")?;
    let signature = owner_signing.sign(&ciphertext);
    let ciphertext_size = ciphertext.len() as u64;

    let file_id = Uuid::new_v4().to_string();
    blobs.put(&file_id, &ciphertext, filename)?;

    ledger.append(Event::Upload {
        file_id: file_id.clone(),
        owner_id: owner_id.to_string(),
        filename: filename.to_string(),
        aes_nonce: nonce,
        signature,
        ciphertext_size,
    })?;

    info!(owner_id, %file_id, ciphertext_size, "uploaded file");

    Ok(UploadOutcome {
        file_id,
        content_key,
        nonce,
        signature,
        ciphertext_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachet_ledger::MemoryLedger;
    use cachet_store::MemoryBlobStore;

    #[test]
    fn test_upload_records_event_and_stores_ciphertext() {
        let ledger = MemoryLedger::new();
        let blobs = MemoryBlobStore::new();
        let alice = SigningKeypair::generate();

        let outcome =
            encrypt_sign_upload(&ledger, &blobs, &alice, "alice", "report.txt", b"secret").unwrap();

        let chain = ledger.read_all().unwrap();
        assert_eq!(chain.len(), 1);
        match &chain[0].event {
            Event::Upload {
                file_id,
                owner_id,
                filename,
                ciphertext_size,
                ..
            } => {
                assert_eq!(file_id, &outcome.file_id);
                assert_eq!(owner_id, "alice");
                assert_eq!(filename, "report.txt");
                assert_eq!(*ciphertext_size, outcome.ciphertext_size);
            }
            other => panic!("expected UPLOAD, got {}", other.type_name()),
        }

        // Ciphertext, not plaintext, is what the blob store holds.
        let stored = blobs.get(&outcome.file_id).unwrap();
        assert_ne!(stored, b"secret");
        assert_eq!(stored.len() as u64, outcome.ciphertext_size);

        // The signature covers the stored ciphertext.
        alice
            .public_key()
            .verify(&stored, &outcome.signature)
            .unwrap();

        // The recovered key decrypts the stored ciphertext.
        let plaintext = outcome
            .content_key
            .decrypt(&outcome.nonce, &stored, b"")
            .unwrap();
        assert_eq!(plaintext, b"secret");
    }

    #[test]
    fn test_each_upload_gets_unique_file_id() {
        let ledger = MemoryLedger::new();
        let blobs = MemoryBlobStore::new();
        let alice = SigningKeypair::generate();

        let a = encrypt_sign_upload(&ledger, &blobs, &alice, "alice", "a.txt", b"one").unwrap();
        let b = encrypt_sign_upload(&ledger, &blobs, &alice, "alice", "b.txt", b"two").unwrap();

        assert_ne!(a.file_id, b.file_id);
    }
}
