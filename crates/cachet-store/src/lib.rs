//! # Cachet Store
//!
//! The external collaborators the sharing protocol talks to: blob storage
//! for ciphertext and the on-disk keystore for per-identity keypairs.
//!
//! Both sit behind narrow interfaces; the core never inspects a blob's
//! content or a key's encoding.

pub mod blob;
pub mod error;
pub mod keystore;

pub use blob::{BlobMeta, BlobStore, DirBlobStore, MemoryBlobStore};
pub use error::{Result, StoreError};
pub use keystore::{Keystore, UserKeys};
