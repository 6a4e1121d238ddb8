//! Symmetric authenticated encryption of file content.
//!
//! ChaCha20-Poly1305 with a 256-bit key and 96-bit nonce. A fresh key and
//! nonce are generated per upload, so nonce reuse under one key cannot
//! occur by construction.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use rand::RngCore;
use std::fmt;

use crate::encoding::impl_serde_hex;
use crate::error::CryptoError;

/// A 256-bit content-encryption key.
///
/// Never persisted in the ledger; it leaves the core immediately after an
/// upload and reenters only wrapped under a requester's public key.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentKey([u8; 32]);

impl ContentKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())))?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encrypt plaintext under this key and nonce.
    pub fn encrypt(
        &self,
        nonce: &ContentNonce,
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;
        cipher
            .encrypt(
                Nonce::from_slice(&nonce.0),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|e| CryptoError::Encryption(e.to_string()))
    }

    /// Decrypt ciphertext under this key and nonce.
    ///
    /// Fails with [`CryptoError::Authentication`] when the tag does not
    /// verify or the associated data mismatches; no partial plaintext is
    /// ever returned.
    pub fn decrypt(
        &self,
        nonce: &ContentNonce,
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;
        cipher
            .decrypt(
                Nonce::from_slice(&nonce.0),
                Payload {
                    msg: ciphertext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::Authentication)
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key bytes stay out of logs.
        f.write_str("ContentKey(..)")
    }
}

/// A 96-bit AEAD nonce.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ContentNonce(pub [u8; 12]);

impl ContentNonce {
    /// Generate a new random nonce.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentNonce({})", self.to_hex())
    }
}

impl_serde_hex!(ContentNonce, 12);

/// Encrypt plaintext under a fresh random key and nonce.
///
/// Returns the generated key and nonce with the ciphertext; the caller must
/// keep the nonce associated with this exact ciphertext.
pub fn seal(plaintext: &[u8], aad: &[u8]) -> Result<(ContentKey, ContentNonce, Vec<u8>), CryptoError> {
    let key = ContentKey::generate();
    let nonce = ContentNonce::generate();
    let ciphertext = key.encrypt(&nonce, plaintext, aad)?;
    Ok((key, nonce, ciphertext))
}
