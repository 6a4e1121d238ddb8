//! Protocol events: the only content the ledger ever records.
//!
//! An event is immutable once created. There is no version field; a new
//! shape would have to arrive under a new `type` tag.

use serde::{Deserialize, Serialize};

use crate::aead::ContentNonce;
use crate::sign::Signature;
use crate::wrap::WrappedKey;

/// A protocol event, tagged by `type` in its serialized form.
///
/// Binary fields serialize as hex strings in the ledger's JSON medium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// An owner published an encrypted file.
    #[serde(rename = "UPLOAD")]
    Upload {
        /// Globally unique id of the uploaded file.
        file_id: String,
        /// Self-asserted identity of the uploader.
        owner_id: String,
        /// Original filename, stored for display only.
        filename: String,
        /// AEAD nonce used for this file's ciphertext.
        aes_nonce: ContentNonce,
        /// Owner's signature over the ciphertext (not the plaintext).
        signature: Signature,
        /// Size of the ciphertext in bytes.
        ciphertext_size: u64,
    },

    /// A requester asked for access. Purely advisory.
    #[serde(rename = "ACCESS_REQUEST")]
    AccessRequest {
        /// The file being requested.
        file_id: String,
        /// Self-asserted identity of the requester.
        requester_id: String,
    },

    /// An owner transmitted a wrapped decryption key to a requester.
    #[serde(rename = "KEY_SHARE")]
    KeyShare {
        /// The file the key decrypts.
        file_id: String,
        /// Self-asserted identity of the sharer.
        owner_id: String,
        /// The recipient of the wrapped key.
        requester_id: String,
        /// The content key, wrapped under the requester's public key.
        wrapped_key: WrappedKey,
    },
}

impl Event {
    /// The file this event concerns.
    pub fn file_id(&self) -> &str {
        match self {
            Event::Upload { file_id, .. }
            | Event::AccessRequest { file_id, .. }
            | Event::KeyShare { file_id, .. } => file_id,
        }
    }

    /// The `type` tag used in the serialized form.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::Upload { .. } => "UPLOAD",
            Event::AccessRequest { .. } => "ACCESS_REQUEST",
            Event::KeyShare { .. } => "KEY_SHARE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap::WrapKeypair;

    #[test]
    fn test_access_request_json_shape() {
        let event = Event::AccessRequest {
            file_id: "f1".into(),
            requester_id: "bob".into(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ACCESS_REQUEST");
        assert_eq!(json["file_id"], "f1");
        assert_eq!(json["requester_id"], "bob");
    }

    #[test]
    fn test_upload_binary_fields_are_hex() {
        let event = Event::Upload {
            file_id: "f1".into(),
            owner_id: "alice".into(),
            filename: "report.txt".into(),
            aes_nonce: ContentNonce::from_bytes([0xab; 12]),
            signature: Signature::from_bytes([0xcd; 64]),
            ciphertext_size: 42,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["aes_nonce"], "ab".repeat(12));
        assert_eq!(json["signature"], "cd".repeat(64));
        assert_eq!(json["ciphertext_size"], 42);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_key_share_roundtrip() {
        let recipient = WrapKeypair::generate();
        let wrapped = recipient.public_key().wrap_key(&[0x11; 32]).unwrap();

        let event = Event::KeyShare {
            file_id: "f1".into(),
            owner_id: "alice".into(),
            requester_id: "bob".into(),
            wrapped_key: wrapped.clone(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(event.type_name(), "KEY_SHARE");
        assert_eq!(event.file_id(), "f1");
    }
}
