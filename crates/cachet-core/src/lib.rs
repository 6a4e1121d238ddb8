//! # Cachet Core
//!
//! Pure primitives for Cachet: envelope crypto, protocol events, blocks,
//! and canonical encoding.
//!
//! This crate contains no I/O, no storage, no locking. It is pure
//! computation over byte buffers and keys.
//!
//! ## Key Types
//!
//! - [`Event`] - A protocol event, the only content the ledger records
//! - [`Block`] - A hash-linked ledger entry wrapping one event
//! - [`ChainHash`] - Blake3 digest linking blocks ([`ChainHash::GENESIS`]
//!   is the first block's `previous_hash` sentinel)
//! - [`ContentKey`] / [`ContentNonce`] - per-upload AEAD material
//! - [`SigningKeypair`] / [`SigningPublicKey`] - owner ciphertext signatures
//! - [`WrapKeypair`] / [`WrapPublicKey`] / [`WrappedKey`] - key transport
//!
//! ## Canonicalization
//!
//! Block hashes are computed over deterministic CBOR. See [`canonical`].

pub mod aead;
pub mod block;
pub mod canonical;
mod encoding;
pub mod error;
pub mod event;
pub mod hash;
pub mod sign;
pub mod wrap;

pub use aead::{seal, ContentKey, ContentNonce};
pub use block::Block;
pub use canonical::{block_digest, block_digest_bytes};
pub use error::CryptoError;
pub use event::Event;
pub use hash::ChainHash;
pub use sign::{Signature, SigningKeypair, SigningPublicKey};
pub use wrap::{WrapKeypair, WrapPublicKey, WrappedKey, WRAPPABLE_KEY_LENGTHS};
