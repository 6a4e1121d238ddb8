//! # Cachet
//!
//! Tamper-evident encrypted file sharing over an append-only, hash-chained
//! event ledger.
//!
//! ## Overview
//!
//! An owner encrypts and publishes a file, a requester asks for access, and
//! the owner grants it by transmitting a wrapped decryption key, every
//! step an immutable ledger entry any party can independently verify:
//!
//! - **Events**: `UPLOAD`, `ACCESS_REQUEST`, and `KEY_SHARE` records are
//!   the ledger's only content
//! - **Blocks**: each event is sealed with a timestamp and the previous
//!   block's hash; any retroactive edit is detectable
//! - **Envelope crypto**: AEAD file encryption, ciphertext signatures, and
//!   asymmetric key wrapping. The scheme is hybrid so the asymmetric work stays bounded
//!   regardless of file size
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cachet::{Config, Vault};
//!
//! fn example() -> cachet::Result<()> {
//!     let vault = Vault::open(&Config::from_env())?;
//!
//!     // Owner publishes a file and keeps the content key.
//!     let upload = vault.upload("alice", "report.txt", b"secret report v1")?;
//!
//!     // Requester asks; owner grants.
//!     vault.request_access("bob", &upload.file_id)?;
//!     vault.share_key("alice", &upload.file_id, "bob", &upload.content_key)?;
//!
//!     // Requester reconstructs and verifies the plaintext.
//!     let plaintext = vault.download("bob", &upload.file_id)?;
//!     assert_eq!(plaintext, b"secret report v1");
//!
//!     // Anyone can audit the chain.
//!     assert!(vault.verify_integrity()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! The component crates are re-exported for direct use:
//!
//! - [`core`] - events, blocks, and envelope-crypto primitives
//! - [`ledger`] - the `Ledger` trait and its backends
//! - [`protocol`] - the four-step sharing choreography
//! - [`store`] - blob storage and the keystore

pub mod config;
pub mod error;
pub mod vault;

// Re-export component crates
pub use cachet_core as core;
pub use cachet_ledger as ledger;
pub use cachet_protocol as protocol;
pub use cachet_store as store;

pub use config::{open_ledger, Config, LedgerBackend};
pub use error::{Result, VaultError};
pub use vault::Vault;

// Re-export commonly used types
pub use cachet_core::{
    Block, ChainHash, ContentKey, ContentNonce, Event, Signature, SigningKeypair,
    SigningPublicKey, WrapKeypair, WrapPublicKey, WrappedKey,
};
pub use cachet_ledger::{Ledger, LocalLedger, MemoryLedger};
pub use cachet_protocol::{ShareState, UploadOutcome};
