use armor_types::{FaceHash, ProofRecord, SignedProof};
use async_trait::async_trait;

use crate::LedgerError;

/// A ledger that stores signed proofs keyed by face hash.
///
/// Commits are first-writer-wins: once a face hash is committed, later
/// submissions for it fail with [`LedgerError::Conflict`] and the committed
/// record never changes.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Commit a signed proof and return the committed record.
    async fn submit(&self, proof: &SignedProof) -> Result<ProofRecord, LedgerError>;

    async fn query_by_face_hash(&self, face: &FaceHash) -> Result<Option<ProofRecord>, LedgerError>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}
