//! Registered human identities.

use serde::{Deserialize, Serialize};

use crate::{ArmorError, Timestamp, TxId};

/// Trust score in `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TrustScore(u8);

impl TrustScore {
    pub const MAX: u8 = 100;

    pub fn new(score: u8) -> Result<Self, ArmorError> {
        if score > Self::MAX {
            return Err(ArmorError::InvalidTrustScore(score));
        }
        Ok(Self(score))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for TrustScore {
    type Error = ArmorError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<TrustScore> for u8 {
    fn from(s: TrustScore) -> Self {
        s.0
    }
}

/// A registered human identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Unique identifier, e.g. a DID.
    pub id: String,
    /// Display name used in notices.
    pub name: String,
    /// Ledger transaction of the identity's registered proof, once there is one.
    pub registry_tx: Option<TxId>,
    pub verified_at: Timestamp,
    pub trust_score: TrustScore,
}

impl IdentityRecord {
    /// Reject records with an empty id or name.
    pub fn validate(&self) -> Result<(), ArmorError> {
        if self.id.trim().is_empty() {
            return Err(ArmorError::InvalidIdentity("empty id".into()));
        }
        if self.name.trim().is_empty() {
            return Err(ArmorError::InvalidIdentity("empty name".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_score_bounds() {
        assert!(TrustScore::new(0).is_ok());
        assert!(TrustScore::new(100).is_ok());
        assert!(matches!(
            TrustScore::new(101),
            Err(ArmorError::InvalidTrustScore(101))
        ));
    }

    #[test]
    fn trust_score_deserialize_is_checked() {
        assert!(serde_json::from_str::<TrustScore>("98").is_ok());
        assert!(serde_json::from_str::<TrustScore>("150").is_err());
    }

    #[test]
    fn identity_requires_name() {
        let record = IdentityRecord {
            id: "did:carm:1".into(),
            name: "  ".into(),
            registry_tx: None,
            verified_at: Timestamp::EPOCH,
            trust_score: TrustScore::new(98).unwrap(),
        };
        assert!(record.validate().is_err());
    }
}
