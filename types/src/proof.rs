//! Proof-of-human-origin records.
//!
//! A [`ProofData`] is what the wallet signs. A [`SignedProof`] is what gets
//! submitted to the ledger. A [`ProofRecord`] is what the ledger returns once
//! the proof is committed: the signed proof plus the transaction id the
//! ledger assigned. Records are immutable after commit.

use serde::{Deserialize, Serialize};

use crate::{ContentHash, FaceHash, Signature, Timestamp, TxId, WalletAddress, WatermarkHash};

/// The three digests computed from one submitted image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHashes {
    pub face: FaceHash,
    pub content: ContentHash,
    pub watermark: WatermarkHash,
}

/// The signed payload of a registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofData {
    pub face_hash: FaceHash,
    pub content_hash: ContentHash,
    pub watermark_hash: WatermarkHash,
    pub wallet: WalletAddress,
    pub timestamp: Timestamp,
}

impl ProofData {
    /// Domain separator prepended to every signed payload.
    pub const SIGNING_DOMAIN: &'static [u8] = b"creativearmor/proof/v1";

    pub fn new(hashes: ImageHashes, wallet: WalletAddress, timestamp: Timestamp) -> Self {
        Self {
            face_hash: hashes.face,
            content_hash: hashes.content,
            watermark_hash: hashes.watermark,
            wallet,
            timestamp,
        }
    }

    /// Canonical byte layout covered by the wallet signature:
    /// `domain ‖ face ‖ content ‖ watermark ‖ len(wallet) as u16 BE ‖ wallet ‖ timestamp as u64 BE`.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let wallet = self.wallet.as_str().as_bytes();
        let mut buf = Vec::with_capacity(Self::SIGNING_DOMAIN.len() + 96 + 2 + wallet.len() + 8);
        buf.extend_from_slice(Self::SIGNING_DOMAIN);
        buf.extend_from_slice(self.face_hash.as_bytes());
        buf.extend_from_slice(self.content_hash.as_bytes());
        buf.extend_from_slice(self.watermark_hash.as_bytes());
        buf.extend_from_slice(&(wallet.len() as u16).to_be_bytes());
        buf.extend_from_slice(wallet);
        buf.extend_from_slice(&self.timestamp.as_secs().to_be_bytes());
        buf
    }

    pub fn hashes(&self) -> ImageHashes {
        ImageHashes {
            face: self.face_hash,
            content: self.content_hash,
            watermark: self.watermark_hash,
        }
    }
}

/// A proof signed by its owning wallet, ready for submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedProof {
    pub data: ProofData,
    pub signature: Signature,
}

/// A committed proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    pub data: ProofData,
    pub signature: Signature,
    pub tx_id: TxId,
}

impl ProofRecord {
    pub fn committed(signed: SignedProof, tx_id: TxId) -> Self {
        Self {
            data: signed.data,
            signature: signed.signature,
            tx_id,
        }
    }

    pub fn face_hash(&self) -> &FaceHash {
        &self.data.face_hash
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.data.content_hash
    }

    pub fn to_signed(&self) -> SignedProof {
        SignedProof {
            data: self.data.clone(),
            signature: self.signature.clone(),
        }
    }
}
