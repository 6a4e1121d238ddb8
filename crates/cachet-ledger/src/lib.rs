//! # Cachet Ledger
//!
//! Append-only, hash-linked event log backends behind one trait.
//!
//! ## Overview
//!
//! The [`Ledger`] trait abstracts the shared medium all participants read
//! and append to. The primary backend is [`LocalLedger`], a single JSON
//! file guarded by a cross-process advisory lock; [`MemoryLedger`] is its
//! in-memory twin for tests and embedding.
//!
//! ## Key Types
//!
//! - [`Ledger`] - append / read_all / verify_integrity
//! - [`LocalLedger`] - file-backed hash chain with locked appends
//! - [`MemoryLedger`] - in-memory backend with identical semantics
//! - [`LedgerError`] - corruption, lock timeout, and I/O failures
//!
//! ## Design Notes
//!
//! - **Crash-safe appends**: whole-file write + atomic rename
//! - **Bounded locking**: lock waits escalate to [`LedgerError::LockTimeout`]
//! - **No silent recovery**: unparseable media surface as
//!   [`LedgerError::ChainCorrupted`], never an implicit reset

pub mod error;
pub mod local;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, Result};
pub use local::{LocalLedger, DEFAULT_LOCK_TIMEOUT};
pub use memory::MemoryLedger;
pub use traits::Ledger;
