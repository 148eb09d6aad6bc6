use std::time::Instant;

use armor_crypto::{derive_address, sign_proof};
use armor_hashing::{ImageHasher, SubmittedImage};
use armor_registry::{CancelSignal, RegistryClient};
use armor_types::{ImageHashes, KeyPair, ProofData, ProofRecord, Timestamp, VerificationResult};
use tracing::{debug, info};

use crate::{classify, VerifyError};

/// Hashing plus registry access. Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct VerificationEngine {
    hasher: ImageHasher,
    registry: RegistryClient,
}

impl VerificationEngine {
    pub fn new(hasher: ImageHasher, registry: RegistryClient) -> Self {
        Self { hasher, registry }
    }

    pub fn hasher(&self) -> &ImageHasher {
        &self.hasher
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Hash `image`, look up its face hash and classify the result.
    ///
    /// Fails only when the image cannot be hashed or the registry cannot be
    /// reached. Absence and mismatch are classifications, not errors.
    pub async fn verify(
        &self,
        image: &SubmittedImage,
        cancel: &CancelSignal,
    ) -> Result<VerificationResult, VerifyError> {
        let submitted = self.hasher.hash_all(image)?;
        self.verify_hashes(submitted, cancel).await
    }

    /// Classify precomputed hashes.
    pub async fn verify_hashes(
        &self,
        submitted: ImageHashes,
        cancel: &CancelSignal,
    ) -> Result<VerificationResult, VerifyError> {
        let started = Instant::now();
        let found = self.registry.lookup_by_face_hash(&submitted.face, cancel).await?;
        let result = classify(submitted, found);
        info!(
            face = %submitted.face.short(),
            classification = result.label(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "verification complete"
        );
        Ok(result)
    }

    /// Hash `image`, sign the proof with `wallet` and commit it.
    ///
    /// Returns the committed record. A face hash that is already registered
    /// fails with `RegistryError::AlreadyRegistered` and leaves the existing
    /// record untouched.
    pub async fn register(
        &self,
        image: &SubmittedImage,
        wallet: &KeyPair,
        now: Timestamp,
        cancel: &CancelSignal,
    ) -> Result<ProofRecord, VerifyError> {
        let hashes = self.hasher.hash_all(image)?;
        let data = ProofData::new(hashes, derive_address(&wallet.public), now);
        let signed = sign_proof(data, wallet);
        debug!(face = %hashes.face.short(), wallet = %signed.data.wallet, "registering proof");
        let record = self.registry.register(&signed, cancel).await?;
        info!(
            tx = %record.tx_id.short(),
            face = %hashes.face.short(),
            "proof registered"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_crypto::keypair_from_seed;
    use armor_hashing::HashingError;
    use armor_nullables::{flat_image, sample_portrait};
    use armor_registry::{NullLedger, RegistryError, RetryPolicy};
    use armor_types::Classification;
    use std::sync::Arc;
    use std::time::Duration;

    fn engine(ledger: Arc<NullLedger>) -> VerificationEngine {
        let registry = RegistryClient::new(ledger, RetryPolicy::immediate(2), Duration::from_secs(1));
        VerificationEngine::new(ImageHasher::default(), registry)
    }

    #[tokio::test]
    async fn registered_image_verifies() {
        let engine = engine(Arc::new(NullLedger::new()));
        let wallet = keypair_from_seed(&[1; 32]);
        let cancel = CancelSignal::never();
        let image = sample_portrait(1, false);

        let record = engine
            .register(&image, &wallet, Timestamp::new(1_700_000_000), &cancel)
            .await
            .unwrap();
        let result = engine.verify(&image, &cancel).await.unwrap();
        assert!(result.is_verified());
        assert_eq!(result.matched_proof(), Some(&record));
    }

    #[tokio::test]
    async fn reencoded_copy_is_mismatched() {
        let engine = engine(Arc::new(NullLedger::new()));
        let wallet = keypair_from_seed(&[1; 32]);
        let cancel = CancelSignal::never();
        let original = sample_portrait(2, false);
        let record = engine
            .register(&original, &wallet, Timestamp::new(1), &cancel)
            .await
            .unwrap();

        let copy = sample_portrait(2, true);
        let result = engine.verify(&copy, &cancel).await.unwrap();
        let mismatch = result.mismatch().unwrap();
        assert_eq!(mismatch.expected, record.data.content_hash);
        assert_eq!(mismatch.actual, engine.hasher().hash_content(&copy));
    }

    #[tokio::test]
    async fn unregistered_face_is_not_found() {
        let engine = engine(Arc::new(NullLedger::new()));
        let result = engine
            .verify(&sample_portrait(3, false), &CancelSignal::never())
            .await
            .unwrap();
        assert_eq!(result.classification, Classification::NotFound);
    }

    #[tokio::test]
    async fn faceless_image_fails_hashing() {
        let engine = engine(Arc::new(NullLedger::new()));
        let err = engine
            .verify(&flat_image(100), &CancelSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::Hashing(HashingError::NoFace(_))));
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn outage_surfaces_as_unavailable() {
        let ledger = Arc::new(NullLedger::new());
        ledger.go_offline();
        let engine = engine(ledger);
        let err = engine
            .verify(&sample_portrait(4, false), &CancelSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Registry(RegistryError::Unavailable { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn second_registration_keeps_first() {
        let engine = engine(Arc::new(NullLedger::new()));
        let cancel = CancelSignal::never();
        let first = engine
            .register(&sample_portrait(5, false), &keypair_from_seed(&[1; 32]), Timestamp::new(1), &cancel)
            .await
            .unwrap();
        let err = engine
            .register(&sample_portrait(5, true), &keypair_from_seed(&[2; 32]), Timestamp::new(2), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Registry(RegistryError::AlreadyRegistered { tx_id }) if tx_id == first.tx_id
        ));
        let result = engine.verify(&sample_portrait(5, false), &cancel).await.unwrap();
        assert_eq!(result.matched_proof(), Some(&first));
    }
}
