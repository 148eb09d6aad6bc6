//! Local append-only ledger over a proof store.

use std::sync::Arc;

use armor_crypto::{transaction_id, verify_proof_signature};
use armor_store::{ProofInsert, ProofStore};
use armor_types::{FaceHash, ProofRecord, SignedProof};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{LedgerBackend, LedgerError};

/// Commits proofs into a [`ProofStore`].
///
/// The signature is checked against the proof's wallet before commit and the
/// transaction id is derived from the signed payload, so the same signed
/// proof always gets the same id.
#[derive(Clone)]
pub struct StoreLedger {
    store: Arc<dyn ProofStore>,
}

impl StoreLedger {
    pub fn new(store: Arc<dyn ProofStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LedgerBackend for StoreLedger {
    async fn submit(&self, proof: &SignedProof) -> Result<ProofRecord, LedgerError> {
        if !verify_proof_signature(proof) {
            return Err(LedgerError::Rejected(format!(
                "signature does not verify for wallet {}",
                proof.data.wallet
            )));
        }
        let record = ProofRecord::committed(proof.clone(), transaction_id(proof));
        match self.store.insert_proof(&record)? {
            ProofInsert::Inserted => {
                info!(
                    tx = %record.tx_id.short(),
                    face = %record.face_hash().short(),
                    "proof committed"
                );
                Ok(record)
            }
            ProofInsert::Exists(existing) => {
                debug!(tx = %existing.tx_id.short(), "face hash already committed");
                Err(LedgerError::Conflict {
                    tx_id: existing.tx_id,
                })
            }
        }
    }

    async fn query_by_face_hash(&self, face: &FaceHash) -> Result<Option<ProofRecord>, LedgerError> {
        Ok(self.store.get_by_face_hash(face)?)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_crypto::{derive_address, keypair_from_seed, sign_proof};
    use armor_nullables::NullStore;
    use armor_types::{ContentHash, ProofData, Timestamp, WatermarkHash};

    fn signed(seed: u8, face: u8, content: u8) -> SignedProof {
        let kp = keypair_from_seed(&[seed; 32]);
        let data = ProofData {
            face_hash: FaceHash::new([face; 32]),
            content_hash: ContentHash::new([content; 32]),
            watermark_hash: WatermarkHash::ZERO,
            wallet: derive_address(&kp.public),
            timestamp: Timestamp::new(1_700_000_000),
        };
        sign_proof(data, &kp)
    }

    #[tokio::test]
    async fn submit_then_query_roundtrip() {
        let ledger = StoreLedger::new(Arc::new(NullStore::new()));
        let proof = signed(1, 1, 1);
        let record = ledger.submit(&proof).await.unwrap();
        assert_eq!(record.to_signed(), proof);
        assert_eq!(record.tx_id, transaction_id(&proof));
        let found = ledger.query_by_face_hash(&proof.data.face_hash).await.unwrap();
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn second_registration_conflicts_and_keeps_first() {
        let ledger = StoreLedger::new(Arc::new(NullStore::new()));
        let first = ledger.submit(&signed(1, 7, 1)).await.unwrap();
        let err = ledger.submit(&signed(2, 7, 2)).await.unwrap_err();
        assert_eq!(err, LedgerError::Conflict { tx_id: first.tx_id });
        let found = ledger.query_by_face_hash(first.face_hash()).await.unwrap();
        assert_eq!(found, Some(first));
    }

    #[tokio::test]
    async fn bad_signature_rejected() {
        let ledger = StoreLedger::new(Arc::new(NullStore::new()));
        let mut proof = signed(1, 1, 1);
        proof.data.content_hash = ContentHash::new([9; 32]);
        assert!(matches!(
            ledger.submit(&proof).await,
            Err(LedgerError::Rejected(_))
        ));
    }
}
