//! Committed proof storage.

use armor_types::{FaceHash, ProofRecord, TxId};

use crate::StoreError;

/// Result of a first-writer-wins insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofInsert {
    Inserted,
    /// A proof for the same face hash was already committed. It is returned
    /// unchanged and the new record was discarded.
    Exists(ProofRecord),
}

/// Append-only proof ledger, keyed by face hash with a secondary tx-id index.
pub trait ProofStore: Send + Sync {
    /// Insert `record` unless its face hash is already present.
    ///
    /// The check and the insert happen in one write transaction, so two
    /// concurrent inserts for the same face hash cannot both succeed.
    fn insert_proof(&self, record: &ProofRecord) -> Result<ProofInsert, StoreError>;

    fn get_by_face_hash(&self, face: &FaceHash) -> Result<Option<ProofRecord>, StoreError>;

    fn get_by_tx(&self, tx_id: &TxId) -> Result<Option<ProofRecord>, StoreError>;

    fn proof_count(&self) -> Result<u64, StoreError>;
}
