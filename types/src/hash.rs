//! 32-byte digest types: face hash, content hash, watermark hash and ledger
//! transaction ids.
//!
//! All four share one representation. They are distinct types so a content
//! hash can never be passed where a face hash is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::ArmorError;

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// Lowercase hex, 64 characters.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// The first 16 hex characters, used when a digest is quoted in prose.
            pub fn short(&self) -> String {
                hex::encode(&self.0[..8])
            }

            pub fn from_hex(s: &str) -> Result<Self, ArmorError> {
                let mut out = [0u8; 32];
                hex::decode_to_slice(s, &mut out).map_err(|e| ArmorError::InvalidHash {
                    kind: $kind,
                    reason: e.to_string(),
                })?;
                Ok(Self(out))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = ArmorError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_hex())
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    Self::from_hex(&s).map_err(serde::de::Error::custom)
                } else {
                    <[u8; 32]>::deserialize(deserializer).map(Self)
                }
            }
        }
    };
}

digest_type!(
    /// Perceptual fingerprint of the face region of an image. Registry key.
    FaceHash,
    "face hash"
);

digest_type!(
    /// Digest of the exact submitted image bytes.
    ContentHash,
    "content hash"
);

digest_type!(
    /// Container-independent digest of the decoded pixel buffer.
    WatermarkHash,
    "watermark hash"
);

digest_type!(
    /// Identifier the ledger assigned to a committed proof.
    TxId,
    "transaction id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let h = FaceHash::new([0xab; 32]);
        let parsed: FaceHash = h.to_hex().parse().unwrap();
        assert_eq!(parsed, h);
        assert_eq!(h.to_hex().len(), 64);
    }

    #[test]
    fn short_is_sixteen_chars() {
        let h = ContentHash::new([0x12; 32]);
        assert_eq!(h.short(), "1212121212121212");
    }

    #[test]
    fn rejects_wrong_length() {
        let err = TxId::from_hex("abcd").unwrap_err();
        assert!(matches!(err, ArmorError::InvalidHash { kind: "transaction id", .. }));
    }

    #[test]
    fn rejects_non_hex() {
        let s = "zz".repeat(32);
        assert!(WatermarkHash::from_hex(&s).is_err());
    }

    #[test]
    fn json_uses_hex_string() {
        let h = ContentHash::new([1u8; 32]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn bincode_uses_raw_bytes() {
        let h = TxId::new([7u8; 32]);
        let encoded = bincode::serialize(&h).unwrap();
        assert_eq!(encoded.len(), 32);
        let decoded: TxId = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, h);
    }
}
