//! On-disk keystore: per-identity signing and wrapping keypairs.
//!
//! Each identity gets one Ed25519 signing keypair and one X25519 wrapping
//! keypair, generated once and reloaded thereafter. Seeds persist as hex
//! files under `<keys_dir>/<identity>/`; public keys are written alongside
//! so another party can read them without touching any secret.

use std::fs;
use std::path::{Path, PathBuf};

use cachet_core::{SigningKeypair, SigningPublicKey, WrapKeypair, WrapPublicKey};

use crate::error::{Result, StoreError};

const SIGN_SEED: &str = "sign.seed";
const SIGN_PUB: &str = "sign.pub";
const WRAP_SEED: &str = "wrap.seed";
const WRAP_PUB: &str = "wrap.pub";

/// Both keypairs held by one identity.
pub struct UserKeys {
    pub signing: SigningKeypair,
    pub wrap: WrapKeypair,
}

/// The keystore rooted at a keys directory.
pub struct Keystore {
    keys_dir: PathBuf,
}

impl Keystore {
    /// Open a keystore rooted at `keys_dir`, creating it if needed.
    pub fn open(keys_dir: impl AsRef<Path>) -> Result<Self> {
        let keys_dir = keys_dir.as_ref().to_path_buf();
        fs::create_dir_all(&keys_dir)?;
        Ok(Self { keys_dir })
    }

    fn user_dir(&self, user_id: &str) -> Result<PathBuf> {
        if user_id.is_empty() || user_id.contains(['/', '\\']) || user_id.contains("..") {
            return Err(StoreError::InvalidIdentity(user_id.to_string()));
        }
        Ok(self.keys_dir.join(user_id))
    }

    /// Load an identity's keys, generating and persisting them on first use.
    /// Idempotent: later calls return the same key material.
    pub fn ensure_keys(&self, user_id: &str) -> Result<UserKeys> {
        let dir = self.user_dir(user_id)?;
        fs::create_dir_all(&dir)?;

        if !dir.join(SIGN_SEED).exists() {
            let signing = SigningKeypair::generate();
            write_hex(&dir.join(SIGN_SEED), &signing.seed())?;
            write_hex(&dir.join(SIGN_PUB), signing.public_key().as_bytes())?;
            tracing::info!(user_id, "generated signing keypair");
        }

        if !dir.join(WRAP_SEED).exists() {
            let wrap = WrapKeypair::generate();
            write_hex(&dir.join(WRAP_SEED), &wrap.seed())?;
            write_hex(&dir.join(WRAP_PUB), wrap.public_key().as_bytes())?;
            tracing::info!(user_id, "generated wrapping keypair");
        }

        self.load_keys(user_id)
    }

    /// Load an identity's persisted keys.
    pub fn load_keys(&self, user_id: &str) -> Result<UserKeys> {
        let dir = self.user_dir(user_id)?;
        if !dir.join(SIGN_SEED).exists() {
            return Err(StoreError::MissingKeys(user_id.to_string()));
        }

        let signing = SigningKeypair::from_seed(&read_seed(&dir.join(SIGN_SEED))?);
        let wrap = WrapKeypair::from_seed(&read_seed(&dir.join(WRAP_SEED))?);
        Ok(UserKeys { signing, wrap })
    }

    /// Read an identity's public signing key without touching secrets.
    pub fn signing_public(&self, user_id: &str) -> Result<SigningPublicKey> {
        let dir = self.user_dir(user_id)?;
        let path = dir.join(SIGN_PUB);
        if !path.exists() {
            return Err(StoreError::MissingKeys(user_id.to_string()));
        }
        SigningPublicKey::from_hex(read_trimmed(&path)?.as_str())
            .map_err(|e| StoreError::InvalidKeyMaterial(e.to_string()))
    }

    /// Read an identity's public wrapping key without touching secrets.
    pub fn wrap_public(&self, user_id: &str) -> Result<WrapPublicKey> {
        let dir = self.user_dir(user_id)?;
        let path = dir.join(WRAP_PUB);
        if !path.exists() {
            return Err(StoreError::MissingKeys(user_id.to_string()));
        }
        WrapPublicKey::from_hex(read_trimmed(&path)?.as_str())
            .map_err(|e| StoreError::InvalidKeyMaterial(e.to_string()))
    }
}

fn write_hex(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, hex::encode(bytes))?;
    Ok(())
}

fn read_trimmed(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}

fn read_seed(path: &Path) -> Result<[u8; 32]> {
    let text = read_trimmed(path)?;
    let bytes = hex::decode(&text)
        .map_err(|e| StoreError::InvalidKeyMaterial(format!("{}: {e}", path.display())))?;
    bytes.try_into().map_err(|_| {
        StoreError::InvalidKeyMaterial(format!("{}: seed must be 32 bytes", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::open(dir.path()).unwrap();

        let created = keystore.ensure_keys("alice").unwrap();
        let loaded = keystore.load_keys("alice").unwrap();

        assert_eq!(
            created.signing.public_key(),
            loaded.signing.public_key()
        );
        assert_eq!(
            created.wrap.public_key().as_bytes(),
            loaded.wrap.public_key().as_bytes()
        );
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::open(dir.path()).unwrap();

        let first = keystore.ensure_keys("alice").unwrap();
        let second = keystore.ensure_keys("alice").unwrap();

        assert_eq!(first.signing.public_key(), second.signing.public_key());
    }

    #[test]
    fn test_public_files_match_keypairs() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::open(dir.path()).unwrap();

        let keys = keystore.ensure_keys("alice").unwrap();

        assert_eq!(
            keystore.signing_public("alice").unwrap(),
            keys.signing.public_key()
        );
        assert_eq!(
            keystore.wrap_public("alice").unwrap().as_bytes(),
            keys.wrap.public_key().as_bytes()
        );
    }

    #[test]
    fn test_load_unknown_identity() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::open(dir.path()).unwrap();

        assert!(matches!(
            keystore.load_keys("nobody"),
            Err(StoreError::MissingKeys(_))
        ));
    }

    #[test]
    fn test_rejects_path_like_identities() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::open(dir.path()).unwrap();

        for bad in ["", "../alice", "a/b"] {
            assert!(matches!(
                keystore.ensure_keys(bad),
                Err(StoreError::InvalidIdentity(_))
            ));
        }
    }

    #[test]
    fn test_distinct_identities_get_distinct_keys() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = Keystore::open(dir.path()).unwrap();

        let alice = keystore.ensure_keys("alice").unwrap();
        let bob = keystore.ensure_keys("bob").unwrap();

        assert_ne!(alice.signing.public_key(), bob.signing.public_key());
    }
}
