//! Test fixtures and helpers.
//!
//! Common setup code for multi-party protocol tests: an in-memory ledger
//! and blob store plus deterministic identities.

use cachet_core::{ContentKey, SigningKeypair, WrapKeypair};
use cachet_ledger::MemoryLedger;
use cachet_protocol::{
    approve_and_share_key, create_access_request, download_and_verify, encrypt_sign_upload,
    Result, UploadOutcome,
};
use cachet_store::MemoryBlobStore;

/// One protocol participant with both keypairs.
pub struct Party {
    pub id: String,
    pub signing: SigningKeypair,
    pub wrap: WrapKeypair,
}

impl Party {
    /// Derive a deterministic party from its identity string.
    ///
    /// The same id always yields the same keys, so tests stay reproducible
    /// without fixture files.
    pub fn from_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            signing: SigningKeypair::from_seed(&derive_seed("sign", id)),
            wrap: WrapKeypair::from_seed(&derive_seed("wrap", id)),
        }
    }
}

fn derive_seed(role: &str, id: &str) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key("cachet testkit seed");
    hasher.update(role.as_bytes());
    hasher.update(b":");
    hasher.update(id.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Create deterministic parties for a multi-party test.
pub fn parties<const N: usize>(ids: [&str; N]) -> [Party; N] {
    ids.map(Party::from_id)
}

/// An in-memory deployment: ledger + blob store.
#[derive(Default)]
pub struct ProtocolFixture {
    pub ledger: MemoryLedger,
    pub blobs: MemoryBlobStore,
}

impl ProtocolFixture {
    /// Create a fresh empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the upload step as `owner`.
    pub fn upload(&self, owner: &Party, filename: &str, plaintext: &[u8]) -> Result<UploadOutcome> {
        encrypt_sign_upload(
            &self.ledger,
            &self.blobs,
            &owner.signing,
            &owner.id,
            filename,
            plaintext,
        )
    }

    /// Run the access-request step as `requester`.
    pub fn request(&self, requester: &Party, file_id: &str) -> Result<()> {
        create_access_request(&self.ledger, &requester.id, file_id)?;
        Ok(())
    }

    /// Run the key-share step from `owner` to `requester`.
    pub fn share(
        &self,
        owner: &Party,
        file_id: &str,
        requester: &Party,
        content_key: &ContentKey,
    ) -> Result<()> {
        approve_and_share_key(
            &self.ledger,
            &owner.id,
            file_id,
            &requester.id,
            &requester.wrap.public_key(),
            content_key,
        )?;
        Ok(())
    }

    /// Run the download-and-verify step as `requester`.
    pub fn download(&self, requester: &Party, owner: &Party, file_id: &str) -> Result<Vec<u8>> {
        download_and_verify(
            &self.ledger,
            &self.blobs,
            &requester.id,
            &requester.wrap,
            &owner.signing.public_key(),
            file_id,
        )
    }
}
