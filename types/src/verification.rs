//! Verification outcomes.

use serde::{Deserialize, Serialize};

use crate::{ContentHash, ImageHashes, ProofRecord};

/// The registered identity was found but the submitted image's content hash differs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Content hash on the ledger.
    pub expected: ContentHash,
    /// Content hash of the submitted image.
    pub actual: ContentHash,
}

impl Mismatch {
    /// Name of the field that disagreed.
    pub fn field(&self) -> &'static str {
        "content_hash"
    }
}

/// Terminal classification of a submitted image against the registry.
///
/// `NotFound` and `Mismatched` carry different evidentiary weight and are
/// never folded into each other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "classification", rename_all = "snake_case")]
pub enum Classification {
    /// Face hash found, content hash matches.
    Verified { proof: ProofRecord },
    /// Face hash found, content hash differs.
    Mismatched { proof: ProofRecord, mismatch: Mismatch },
    /// Face hash absent from the registry.
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub submitted: ImageHashes,
    pub classification: Classification,
}

impl VerificationResult {
    pub fn is_verified(&self) -> bool {
        matches!(self.classification, Classification::Verified { .. })
    }

    pub fn matched_proof(&self) -> Option<&ProofRecord> {
        match &self.classification {
            Classification::Verified { proof } | Classification::Mismatched { proof, .. } => {
                Some(proof)
            }
            Classification::NotFound => None,
        }
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match &self.classification {
            Classification::Mismatched { mismatch, .. } => Some(mismatch),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.classification {
            Classification::Verified { .. } => "verified",
            Classification::Mismatched { .. } => "mismatched",
            Classification::NotFound => "not_found",
        }
    }
}
