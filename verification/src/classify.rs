use armor_types::{Classification, ImageHashes, Mismatch, ProofRecord, VerificationResult};

/// Classify a submitted image against the record found for its face hash, if any.
///
/// Pure. The caller must only pass a record whose face hash equals the
/// submitted image's; a record for another face is treated as absent.
pub fn classify(submitted: ImageHashes, found: Option<ProofRecord>) -> VerificationResult {
    let classification = match found {
        Some(proof) if proof.data.face_hash == submitted.face => {
            if proof.data.content_hash == submitted.content {
                Classification::Verified { proof }
            } else {
                let mismatch = Mismatch {
                    expected: proof.data.content_hash,
                    actual: submitted.content,
                };
                Classification::Mismatched { proof, mismatch }
            }
        }
        _ => Classification::NotFound,
    };
    VerificationResult {
        submitted,
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_types::{
        ContentHash, FaceHash, ProofData, Signature, Timestamp, TxId, WalletAddress,
        WatermarkHash,
    };

    fn submitted(face: u8, content: u8) -> ImageHashes {
        ImageHashes {
            face: FaceHash::new([face; 32]),
            content: ContentHash::new([content; 32]),
            watermark: WatermarkHash::ZERO,
        }
    }

    fn record(face: u8, content: u8) -> ProofRecord {
        let h = submitted(face, content);
        ProofRecord {
            data: ProofData::new(h, WalletAddress::parse("carm_x").unwrap(), Timestamp::new(1)),
            signature: Signature([0; 64]),
            tx_id: TxId::new([1; 32]),
        }
    }

    #[test]
    fn matching_content_is_verified() {
        let result = classify(submitted(1, 2), Some(record(1, 2)));
        assert!(result.is_verified());
        assert_eq!(result.label(), "verified");
        assert!(result.mismatch().is_none());
    }

    #[test]
    fn differing_content_is_mismatched_with_pair() {
        let result = classify(submitted(1, 3), Some(record(1, 2)));
        let mismatch = result.mismatch().unwrap();
        assert_eq!(mismatch.field(), "content_hash");
        assert_eq!(mismatch.expected, ContentHash::new([2; 32]));
        assert_eq!(mismatch.actual, ContentHash::new([3; 32]));
        assert!(!result.is_verified());
    }

    #[test]
    fn absent_is_not_found() {
        let result = classify(submitted(1, 2), None);
        assert_eq!(result.classification, Classification::NotFound);
        assert!(result.matched_proof().is_none());
    }

    #[test]
    fn record_for_other_face_is_not_found() {
        let result = classify(submitted(1, 2), Some(record(9, 2)));
        assert_eq!(result.classification, Classification::NotFound);
    }
}
