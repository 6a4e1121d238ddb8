//! Key transport: wrapping a short symmetric key for one recipient.
//!
//! Ephemeral-static X25519 agreement, a Blake3-derived key-encryption key
//! bound to both public keys, and ChaCha20-Poly1305 over the key bytes.
//! The asymmetric work stays bounded to a fixed-size payload no matter how
//! large the shared file is.

use rand::RngCore;
use std::fmt;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

use crate::aead::{ContentKey, ContentNonce};
use crate::error::CryptoError;

/// Symmetric key lengths accepted by [`WrapPublicKey::wrap_key`].
pub const WRAPPABLE_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// An X25519 public key used to receive wrapped keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrapPublicKey(pub [u8; 32]);

impl WrapPublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("wrap key must be 32 bytes".into()))?;
        Ok(Self(arr))
    }

    /// Wrap a short symmetric key for the holder of the matching secret.
    pub fn wrap_key(&self, key_bytes: &[u8]) -> Result<WrappedKey, CryptoError> {
        if !WRAPPABLE_KEY_LENGTHS.contains(&key_bytes.len()) {
            return Err(CryptoError::InvalidKey(format!(
                "wrappable key must be 16, 24, or 32 bytes, got {}",
                key_bytes.len()
            )));
        }

        let ephemeral = EphemeralSecret::random_from_rng(rand::thread_rng());
        let ephemeral_public = WrapPublicKey(*PublicKey::from(&ephemeral).as_bytes());

        let shared = ephemeral.diffie_hellman(&PublicKey::from(self.0));
        let kek = derive_wrap_key(shared.as_bytes(), &ephemeral_public, self);

        let nonce = ContentNonce::generate();
        let key_ct = kek.encrypt(&nonce, key_bytes, b"")?;

        Ok(WrappedKey {
            ephemeral_public,
            nonce,
            key_ct,
        })
    }
}

impl fmt::Debug for WrapPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WrapPub({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for WrapPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An X25519 static secret used to unwrap received keys.
pub struct WrapKeypair {
    secret: StaticSecret,
}

impl WrapKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            secret: StaticSecret::from(bytes),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            secret: StaticSecret::from(*seed),
        }
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// Derive the public key.
    pub fn public_key(&self) -> WrapPublicKey {
        WrapPublicKey(*PublicKey::from(&self.secret).as_bytes())
    }

    /// Unwrap a key wrapped for this keypair.
    ///
    /// Fails with [`CryptoError::Unwrap`] on any corruption or wrong key.
    pub fn unwrap_key(&self, wrapped: &WrappedKey) -> Result<Vec<u8>, CryptoError> {
        let shared = self
            .secret
            .diffie_hellman(&PublicKey::from(wrapped.ephemeral_public.0));
        let kek = derive_wrap_key(shared.as_bytes(), &wrapped.ephemeral_public, &self.public_key());

        kek.decrypt(&wrapped.nonce, &wrapped.key_ct, b"")
            .map_err(|_| CryptoError::Unwrap("wrong key or corrupted blob".into()))
    }
}

impl fmt::Debug for WrapKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WrapKeypair({:?})", self.public_key())
    }
}

/// Derive the key-encryption key from the shared secret and transcript.
fn derive_wrap_key(
    shared: &[u8; 32],
    ephemeral: &WrapPublicKey,
    recipient: &WrapPublicKey,
) -> ContentKey {
    let mut hasher = blake3::Hasher::new_derive_key("cachet wrap v1");
    hasher.update(shared);
    hasher.update(&ephemeral.0);
    hasher.update(&recipient.0);
    ContentKey::from_bytes(*hasher.finalize().as_bytes())
}

/// A symmetric key wrapped under a recipient's public key.
///
/// Safe to store and transmit in the clear-text ledger. Wire layout:
/// ephemeral public key (32) || nonce (12) || AEAD ciphertext.
#[derive(Clone, PartialEq, Eq)]
pub struct WrappedKey {
    /// Sender's ephemeral X25519 public key.
    pub ephemeral_public: WrapPublicKey,
    /// Nonce for the key-encryption AEAD.
    pub nonce: ContentNonce,
    /// The key bytes, encrypted and authenticated.
    pub key_ct: Vec<u8>,
}

// Ephemeral public (32) + nonce (12) + at least a Poly1305 tag (16).
const WRAPPED_MIN_LEN: usize = 32 + 12 + 16;

impl WrappedKey {
    /// Serialize to the wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(44 + self.key_ct.len());
        buf.extend_from_slice(&self.ephemeral_public.0);
        buf.extend_from_slice(&self.nonce.0);
        buf.extend_from_slice(&self.key_ct);
        buf
    }

    /// Parse from the wire layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < WRAPPED_MIN_LEN {
            return Err(CryptoError::Unwrap(format!(
                "wrapped key blob too short: {} bytes",
                bytes.len()
            )));
        }
        let mut ephemeral = [0u8; 32];
        ephemeral.copy_from_slice(&bytes[..32]);
        let mut nonce = [0u8; 12];
        nonce.copy_from_slice(&bytes[32..44]);
        Ok(Self {
            ephemeral_public: WrapPublicKey(ephemeral),
            nonce: ContentNonce(nonce),
            key_ct: bytes[44..].to_vec(),
        })
    }

    /// Convert to hex string (the ledger's event encoding).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Debug for WrappedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WrappedKey({} bytes)", 44 + self.key_ct.len())
    }
}

impl serde::Serialize for WrappedKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::encoding::serialize_hex(&self.to_bytes(), serializer)
    }
}

impl<'de> serde::Deserialize<'de> for WrappedKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = crate::encoding::deserialize_hex_vec(deserializer)?;
        WrappedKey::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_unwrap_roundtrip_all_lengths() {
        let recipient = WrapKeypair::generate();

        for len in WRAPPABLE_KEY_LENGTHS {
            let key_bytes: Vec<u8> = (0..len as u8).collect();
            let wrapped = recipient.public_key().wrap_key(&key_bytes).unwrap();
            let unwrapped = recipient.unwrap_key(&wrapped).unwrap();
            assert_eq!(unwrapped, key_bytes);
        }
    }

    #[test]
    fn test_unwrap_with_unrelated_key_fails() {
        let recipient = WrapKeypair::generate();
        let stranger = WrapKeypair::generate();

        let wrapped = recipient.public_key().wrap_key(&[0xab; 32]).unwrap();

        assert!(matches!(
            stranger.unwrap_key(&wrapped),
            Err(CryptoError::Unwrap(_))
        ));
    }

    #[test]
    fn test_corrupted_blob_fails() {
        let recipient = WrapKeypair::generate();
        let mut wrapped = recipient.public_key().wrap_key(&[0xab; 32]).unwrap();
        wrapped.key_ct[0] ^= 0x01;

        assert!(recipient.unwrap_key(&wrapped).is_err());
    }

    #[test]
    fn test_rejects_odd_key_lengths() {
        let recipient = WrapKeypair::generate();
        assert!(recipient.public_key().wrap_key(&[0u8; 15]).is_err());
        assert!(recipient.public_key().wrap_key(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_wire_roundtrip() {
        let recipient = WrapKeypair::generate();
        let wrapped = recipient.public_key().wrap_key(&[0x42; 32]).unwrap();

        let recovered = WrappedKey::from_bytes(&wrapped.to_bytes()).unwrap();
        assert_eq!(recovered, wrapped);
        assert_eq!(recipient.unwrap_key(&recovered).unwrap(), vec![0x42; 32]);
    }

    #[test]
    fn test_truncated_blob_rejected() {
        assert!(WrappedKey::from_bytes(&[0u8; WRAPPED_MIN_LEN - 1]).is_err());
    }

    #[test]
    fn test_deterministic_from_seed() {
        let seed = [0x42u8; 32];
        let kp1 = WrapKeypair::from_seed(&seed);
        let kp2 = WrapKeypair::from_seed(&seed);
        assert_eq!(kp1.public_key().as_bytes(), kp2.public_key().as_bytes());
    }
}
