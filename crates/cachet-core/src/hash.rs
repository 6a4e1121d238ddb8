//! Chain hashing with Blake3.

use std::fmt;

use crate::encoding::impl_serde_hex;

/// A 32-byte Blake3 digest linking blocks into the chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainHash(pub [u8; 32]);

impl ChainHash {
    /// Compute the Blake3 digest of the given data.
    pub fn digest(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

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
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The genesis sentinel: `previous_hash` of the first block in a chain.
    pub const GENESIS: Self = Self([0u8; 32]);
}

impl fmt::Debug for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for ChainHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ChainHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl_serde_hex!(ChainHash, 32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let data = b"block bytes";
        assert_eq!(ChainHash::digest(data), ChainHash::digest(data));
        assert_ne!(ChainHash::digest(data), ChainHash::digest(b"other bytes"));
    }

    #[test]
    fn test_hex_roundtrip() {
        let h = ChainHash::digest(b"x");
        let recovered = ChainHash::from_hex(&h.to_hex()).unwrap();
        assert_eq!(h, recovered);
    }

    #[test]
    fn test_genesis_is_all_zero() {
        assert_eq!(ChainHash::GENESIS.to_hex(), "0".repeat(64));
    }

    #[test]
    fn test_json_serializes_as_hex() {
        let h = ChainHash::GENESIS;
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", "0".repeat(64)));
        let back: ChainHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
