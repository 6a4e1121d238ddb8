//! Error types for the Cachet core.

use thiserror::Error;

/// Errors that can occur in the envelope-crypto primitives.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The AEAD authentication tag (or associated data) did not verify.
    #[error("ciphertext failed authentication")]
    Authentication,

    /// A signature did not verify against the message and public key.
    #[error("signature verification failed")]
    Signature,

    /// A public key could not be interpreted as a valid curve point.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Unwrapping a wrapped key failed (wrong private key or corrupted blob).
    #[error("key unwrap failed: {0}")]
    Unwrap(String),

    /// The cipher rejected an encryption request.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Key material with an unexpected length or encoding.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
