//! # Cachet Protocol
//!
//! The four-step sharing choreography, built entirely from envelope-crypto
//! outputs recorded through the ledger:
//!
//! 1. **Upload** (owner): encrypt, sign the ciphertext, store the blob,
//!    append `UPLOAD`. The content key stays with the caller.
//! 2. **Access request** (requester): append `ACCESS_REQUEST`. Advisory.
//! 3. **Approve & share** (owner): wrap the content key for the requester,
//!    append `KEY_SHARE`.
//! 4. **Download & verify** (requester): find the upload and the most
//!    recent key share, unwrap, verify the owner's signature over the
//!    ciphertext, decrypt.
//!
//! Each producer step is one ledger append; downloads are local reads and
//! never logged. Trust flows from the chain: later steps are only
//! meaningful because earlier ones are immutable.

pub mod download;
pub mod error;
pub mod sharing;
pub mod state;
pub mod upload;

pub use download::{download_and_verify, find_latest_key_share, find_upload};
pub use error::{ProtocolError, Result};
pub use sharing::{approve_and_share_key, create_access_request};
pub use state::{share_state, ShareState};
pub use upload::{encrypt_sign_upload, UploadOutcome};
