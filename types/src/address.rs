//! Wallet address type with `carm_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ArmorError;

/// The wallet that owns a registered proof.
///
/// Derived from the wallet's Ed25519 public key via base32 encoding plus a
/// Blake2b checksum (see `armor_crypto::derive_address`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// The standard prefix for all wallet addresses.
    pub const PREFIX: &'static str = "carm_";

    /// Parse an address string, checking only its outer shape.
    ///
    /// Checksum validation lives in `armor_crypto::decode_address`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ArmorError> {
        let s = raw.into();
        if !s.starts_with(Self::PREFIX) || s.len() <= Self::PREFIX.len() {
            return Err(ArmorError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    /// Wrap a string that was produced by address derivation.
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ArmorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<WalletAddress> for String {
    fn from(addr: WalletAddress) -> Self {
        addr.0
    }
}
