//! Certificates of inauthenticity.

use armor_types::{Mismatch, ProofRecord, Timestamp, VerificationResult};
use serde::{Deserialize, Serialize};

/// Printable evidence that a detected image contradicts a registered proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub text: String,
    /// `{explorer_base}/tx/{tx_id}`.
    pub tx_link: String,
    pub mismatch_notice: String,
    pub issued_at: Timestamp,
}

impl Certificate {
    /// Build a certificate from a verification result. `None` unless the
    /// result is a mismatch.
    pub fn from_result(
        result: &VerificationResult,
        explorer_base: &str,
        issued_at: Timestamp,
    ) -> Option<Self> {
        let proof = result.matched_proof()?;
        let mismatch = result.mismatch()?;
        Some(Self::issue(proof, mismatch, explorer_base, issued_at))
    }

    pub fn issue(
        proof: &ProofRecord,
        mismatch: &Mismatch,
        explorer_base: &str,
        issued_at: Timestamp,
    ) -> Self {
        let tx_link = format!("{}/tx/{}", explorer_base.trim_end_matches('/'), proof.tx_id);
        let mismatch_notice = format!(
            "Face identity verified against the registry, but image hash mismatch detected. \
             Original registered: {}..., Detected: {}...",
            mismatch.expected.short(),
            mismatch.actual.short()
        );
        let wallet = proof.data.wallet.as_str();
        let wallet_prefix: String = wallet.chars().take(16).collect();

        let text = format!(
            "CERTIFICATE OF INAUTHENTICITY\n\
             Issued: {issued}\n\n\
             PROOF OF HUMAN ORIGIN\n\
             Face Hash: {face}...\n\
             Original Image Hash: {expected}...\n\
             Detected Image Hash: {actual}...\n\n\
             BLOCKCHAIN VERIFICATION\n\
             Transaction: {tx}\n\
             Registered Wallet: {wallet_prefix}...\n\
             Registration Time: {registered}\n\
             Verification Link: {tx_link}\n\n\
             MISMATCH DETECTED\n\
             {mismatch_notice}\n",
            issued = issued_at.to_rfc3339(),
            face = proof.face_hash().short(),
            expected = mismatch.expected.short(),
            actual = mismatch.actual.short(),
            tx = proof.tx_id,
            registered = proof.data.timestamp.to_rfc3339(),
        );

        Self {
            text,
            tx_link,
            mismatch_notice,
            issued_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_types::{
        Classification, ContentHash, FaceHash, ImageHashes, ProofData, Signature, TxId,
        WalletAddress, WatermarkHash,
    };

    fn record() -> ProofRecord {
        ProofRecord {
            data: ProofData {
                face_hash: FaceHash::new([0xAB; 32]),
                content_hash: ContentHash::new([0x11; 32]),
                watermark_hash: WatermarkHash::ZERO,
                wallet: WalletAddress::new_unchecked("carm_registeredwalletaddress".into()),
                timestamp: Timestamp::new(1_700_000_000),
            },
            signature: Signature([0; 64]),
            tx_id: TxId::new([0x42; 32]),
        }
    }

    fn submitted(content: u8) -> ImageHashes {
        ImageHashes {
            face: FaceHash::new([0xAB; 32]),
            content: ContentHash::new([content; 32]),
            watermark: WatermarkHash::ZERO,
        }
    }

    #[test]
    fn mismatch_yields_certificate() {
        let result = VerificationResult {
            submitted: submitted(0x22),
            classification: Classification::Mismatched {
                proof: record(),
                mismatch: Mismatch {
                    expected: ContentHash::new([0x11; 32]),
                    actual: ContentHash::new([0x22; 32]),
                },
            },
        };
        let cert =
            Certificate::from_result(&result, "https://explorer.example/", Timestamp::new(1_700_000_100))
                .unwrap();
        let tx = TxId::new([0x42; 32]).to_hex();
        assert_eq!(cert.tx_link, format!("https://explorer.example/tx/{tx}"));
        assert!(cert.text.starts_with("CERTIFICATE OF INAUTHENTICITY"));
        assert!(cert.text.contains("Original Image Hash: 1111111111111111..."));
        assert!(cert.text.contains("Detected Image Hash: 2222222222222222..."));
        assert!(cert.text.contains("Registered Wallet: carm_registeredwa..."));
        assert!(cert.mismatch_notice.contains("Detected: 2222222222222222..."));
    }

    #[test]
    fn verified_and_not_found_yield_nothing() {
        let verified = VerificationResult {
            submitted: submitted(0x11),
            classification: Classification::Verified { proof: record() },
        };
        let absent = VerificationResult {
            submitted: submitted(0x11),
            classification: Classification::NotFound,
        };
        assert!(Certificate::from_result(&verified, "x", Timestamp::new(0)).is_none());
        assert!(Certificate::from_result(&absent, "x", Timestamp::new(0)).is_none());
    }
}
