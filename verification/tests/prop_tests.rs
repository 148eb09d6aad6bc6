use proptest::prelude::*;

use armor_types::{
    Classification, ContentHash, FaceHash, ImageHashes, ProofData, ProofRecord, Signature,
    Timestamp, TxId, WalletAddress, WatermarkHash,
};
use armor_verification::classify;

fn hashes(face: [u8; 32], content: [u8; 32]) -> ImageHashes {
    ImageHashes {
        face: FaceHash::new(face),
        content: ContentHash::new(content),
        watermark: WatermarkHash::ZERO,
    }
}

fn record(h: ImageHashes) -> ProofRecord {
    ProofRecord {
        data: ProofData::new(h, WalletAddress::parse("carm_prop").unwrap(), Timestamp::new(1)),
        signature: Signature([0; 64]),
        tx_id: TxId::new([1; 32]),
    }
}

proptest! {
    /// A face hash that was never registered is NotFound, never Mismatched.
    #[test]
    fn absent_face_never_mismatched(face in prop::array::uniform32(0u8..), content in prop::array::uniform32(0u8..)) {
        let result = classify(hashes(face, content), None);
        prop_assert_eq!(result.classification, Classification::NotFound);
    }

    /// Same face, different content is always Mismatched with the right pair.
    #[test]
    fn differing_content_always_mismatched(
        face in prop::array::uniform32(0u8..),
        registered in prop::array::uniform32(0u8..),
        submitted in prop::array::uniform32(0u8..),
    ) {
        prop_assume!(registered != submitted);
        let result = classify(hashes(face, submitted), Some(record(hashes(face, registered))));
        let mismatch = result.mismatch().cloned();
        prop_assert!(mismatch.is_some());
        let mismatch = mismatch.unwrap();
        prop_assert_eq!(mismatch.expected, ContentHash::new(registered));
        prop_assert_eq!(mismatch.actual, ContentHash::new(submitted));
    }

    /// Verified requires both hashes to match.
    #[test]
    fn verified_iff_both_match(
        face in prop::array::uniform32(0u8..),
        content in prop::array::uniform32(0u8..),
        other in prop::array::uniform32(0u8..),
    ) {
        let registered = record(hashes(face, content));
        prop_assert!(classify(hashes(face, content), Some(registered.clone())).is_verified());
        if other != content {
            prop_assert!(!classify(hashes(face, other), Some(registered)).is_verified());
        }
    }
}
