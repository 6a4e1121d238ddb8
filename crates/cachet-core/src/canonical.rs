//! Canonical CBOR encoding for block digests.
//!
//! Implements RFC 8949 Core Deterministic Encoding for the subset of values
//! a block contains:
//! - Map keys sorted by encoded byte comparison
//! - Integers use the smallest valid encoding
//! - Definite lengths only, no floats
//!
//! The digest input is the canonical encoding of {timestamp, previous_hash,
//! event}; re-serialization is byte-identical on every platform, which is
//! what makes the hash chain's tamper-detection contract hold. Blocks are
//! persisted as JSON, so only the encode path exists here.

use ciborium::value::Value;

use crate::event::Event;
use crate::hash::ChainHash;

/// Block envelope field keys (integer keys for compact encoding).
mod keys {
    pub const TIMESTAMP: u64 = 0;
    pub const PREV_HASH: u64 = 1;
    pub const EVENT: u64 = 2;
}

/// Canonical bytes of a block's hashed fields.
pub fn block_digest_bytes(timestamp: i64, previous_hash: &ChainHash, event: &Event) -> Vec<u8> {
    let value = Value::Map(vec![
        (
            Value::Integer(keys::TIMESTAMP.into()),
            Value::Integer(timestamp.into()),
        ),
        (
            Value::Integer(keys::PREV_HASH.into()),
            Value::Bytes(previous_hash.0.to_vec()),
        ),
        (Value::Integer(keys::EVENT.into()), event_to_value(event)),
    ]);

    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

/// The Blake3 digest over a block's canonical bytes.
pub fn block_digest(timestamp: i64, previous_hash: &ChainHash, event: &Event) -> ChainHash {
    ChainHash::digest(&block_digest_bytes(timestamp, previous_hash, event))
}

/// Convert an event to a CBOR map with text keys.
///
/// Binary fields are encoded as CBOR byte strings here (hex is only for the
/// human-readable boundary). Key order is handled by the canonical encoder.
fn event_to_value(event: &Event) -> Value {
    let text = |s: &str| Value::Text(s.to_string());

    let entries = match event {
        Event::Upload {
            file_id,
            owner_id,
            filename,
            aes_nonce,
            signature,
            ciphertext_size,
        } => vec![
            (text("type"), text("UPLOAD")),
            (text("file_id"), text(file_id)),
            (text("owner_id"), text(owner_id)),
            (text("filename"), text(filename)),
            (text("aes_nonce"), Value::Bytes(aes_nonce.0.to_vec())),
            (text("signature"), Value::Bytes(signature.0.to_vec())),
            (
                text("ciphertext_size"),
                Value::Integer((*ciphertext_size).into()),
            ),
        ],
        Event::AccessRequest {
            file_id,
            requester_id,
        } => vec![
            (text("type"), text("ACCESS_REQUEST")),
            (text("file_id"), text(file_id)),
            (text("requester_id"), text(requester_id)),
        ],
        Event::KeyShare {
            file_id,
            owner_id,
            requester_id,
            wrapped_key,
        } => vec![
            (text("type"), text("KEY_SHARE")),
            (text("file_id"), text(file_id)),
            (text("owner_id"), text(owner_id)),
            (text("requester_id"), text(requester_id)),
            (text("wrapped_key"), Value::Bytes(wrapped_key.to_bytes())),
        ],
    };

    Value::Map(entries)
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Map(entries) => encode_map_canonical(buf, entries),
        _ => panic!("value type not used in block encoding"),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aead::ContentNonce;
    use crate::sign::Signature;

    fn sample_event() -> Event {
        Event::Upload {
            file_id: "f1".into(),
            owner_id: "alice".into(),
            filename: "report.txt".into(),
            aes_nonce: ContentNonce::from_bytes([0x01; 12]),
            signature: Signature::from_bytes([0x02; 64]),
            ciphertext_size: 1024,
        }
    }

    #[test]
    fn test_digest_deterministic() {
        let event = sample_event();
        let b1 = block_digest_bytes(1736870400000, &ChainHash::GENESIS, &event);
        let b2 = block_digest_bytes(1736870400000, &ChainHash::GENESIS, &event);
        assert_eq!(b1, b2);
    }

    #[test]
    fn test_digest_survives_serde_roundtrip() {
        // The hash must be recomputable from a block that was persisted as
        // JSON and read back.
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let reparsed: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(
            block_digest(1736870400000, &ChainHash::GENESIS, &event),
            block_digest(1736870400000, &ChainHash::GENESIS, &reparsed),
        );
    }

    #[test]
    fn test_digest_changes_with_each_field() {
        let event = sample_event();
        let base = block_digest(1000, &ChainHash::GENESIS, &event);

        assert_ne!(base, block_digest(1001, &ChainHash::GENESIS, &event));
        assert_ne!(
            base,
            block_digest(1000, &ChainHash::from_bytes([0x01; 32]), &event)
        );

        let other_event = Event::AccessRequest {
            file_id: "f1".into(),
            requester_id: "bob".into(),
        };
        assert_ne!(base, block_digest(1000, &ChainHash::GENESIS, &other_event));
    }

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();

        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);
    }

    #[test]
    fn test_map_key_ordering() {
        // Text keys sort by encoded bytes: length first, then lexicographic.
        let mut buf = Vec::new();
        let entries = vec![
            (Value::Text("type".into()), Value::Integer(1.into())),
            (Value::Text("file_id".into()), Value::Integer(2.into())),
            (Value::Text("id".into()), Value::Integer(3.into())),
        ];
        encode_map_canonical(&mut buf, &entries);

        // Map header for 3 entries.
        assert_eq!(buf[0], 0xa3);
        // "id" (2 chars) sorts before "type" (4) before "file_id" (7).
        assert_eq!(&buf[1..4], &[0x62, b'i', b'd']);
        assert_eq!(buf[4], 0x03);
        assert_eq!(&buf[5..10], &[0x64, b't', b'y', b'p', b'e']);
        assert_eq!(buf[10], 0x01);
    }
}
