//! The Vault: one opened deployment, wired together.
//!
//! A `Vault` holds one explicit ledger handle plus the blob store and
//! keystore collaborators, and resolves identities to keys before
//! delegating to the protocol layer. There is no process-global state;
//! every caller passes or holds a `Vault`.

use cachet_core::{Block, ChainHash, ContentKey, Event, WrappedKey};
use cachet_ledger::Ledger;
use cachet_protocol::{
    approve_and_share_key, create_access_request, download_and_verify, encrypt_sign_upload,
    find_upload, share_state, ProtocolError, ShareState, UploadOutcome,
};
use cachet_store::{BlobMeta, BlobStore, DirBlobStore, Keystore};

use crate::config::{open_ledger, Config};
use crate::error::Result;

/// An opened Cachet deployment.
pub struct Vault {
    ledger: Box<dyn Ledger>,
    blobs: DirBlobStore,
    keystore: Keystore,
}

impl Vault {
    /// Open the configured ledger, blob store, and keystore.
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self {
            ledger: open_ledger(config)?,
            blobs: DirBlobStore::open(&config.cloud_dir)?,
            keystore: Keystore::open(&config.keys_dir)?,
        })
    }

    /// Encrypt and publish a file as `owner_id`, recording the `UPLOAD`
    /// event. Keys for the owner are created on first use.
    ///
    /// The returned [`UploadOutcome`] carries the content key; the vault
    /// does not retain it.
    pub fn upload(&self, owner_id: &str, filename: &str, plaintext: &[u8]) -> Result<UploadOutcome> {
        let keys = self.keystore.ensure_keys(owner_id)?;
        Ok(encrypt_sign_upload(
            self.ledger.as_ref(),
            &self.blobs,
            &keys.signing,
            owner_id,
            filename,
            plaintext,
        )?)
    }

    /// Record an access request as `requester_id`, ensuring the requester
    /// has keys a later share can address.
    pub fn request_access(&self, requester_id: &str, file_id: &str) -> Result<ChainHash> {
        self.keystore.ensure_keys(requester_id)?;
        Ok(create_access_request(
            self.ledger.as_ref(),
            requester_id,
            file_id,
        )?)
    }

    /// Share `content_key` for a file to a requester as `owner_id`.
    pub fn share_key(
        &self,
        owner_id: &str,
        file_id: &str,
        requester_id: &str,
        content_key: &ContentKey,
    ) -> Result<WrappedKey> {
        let requester_public = self.keystore.wrap_public(requester_id)?;
        Ok(approve_and_share_key(
            self.ledger.as_ref(),
            owner_id,
            file_id,
            requester_id,
            &requester_public,
            content_key,
        )?)
    }

    /// Download and verify a shared file as `requester_id`.
    ///
    /// The owner's public signing key is resolved from the `UPLOAD` event's
    /// `owner_id` through the keystore.
    pub fn download(&self, requester_id: &str, file_id: &str) -> Result<Vec<u8>> {
        let blocks = self.ledger.read_all()?;
        let Some(Event::Upload { owner_id, .. }) = find_upload(&blocks, file_id) else {
            return Err(ProtocolError::MissingUpload {
                file_id: file_id.to_string(),
            }
            .into());
        };

        let owner_public = self.keystore.signing_public(owner_id)?;
        let keys = self.keystore.load_keys(requester_id)?;

        Ok(download_and_verify(
            self.ledger.as_ref(),
            &self.blobs,
            requester_id,
            &keys.wrap,
            &owner_public,
            file_id,
        )?)
    }

    /// Full chain snapshot.
    pub fn events(&self) -> Result<Vec<Block>> {
        Ok(self.ledger.read_all()?)
    }

    /// Walk the chain and check every link and digest.
    pub fn verify_integrity(&self) -> Result<bool> {
        Ok(self.ledger.verify_integrity()?)
    }

    /// Replay the chain into the state of one `(file_id, requester_id)` pair.
    pub fn share_state(&self, file_id: &str, requester_id: &str) -> Result<ShareState> {
        let blocks = self.ledger.read_all()?;
        Ok(share_state(&blocks, file_id, requester_id))
    }

    /// List stored blobs with their metadata.
    pub fn list_files(&self) -> Result<Vec<BlobMeta>> {
        Ok(self.blobs.list()?)
    }

    /// The underlying ledger handle.
    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    /// The keystore collaborator.
    pub fn keystore(&self) -> &Keystore {
        &self.keystore
    }
}
