//! LMDB implementation of ProofStore.

use armor_store::{ProofInsert, ProofStore, StoreError};
use armor_types::{FaceHash, ProofRecord, TxId};
use tracing::debug;

use crate::{decode, encode, LmdbError, LmdbStore};

impl ProofStore for LmdbStore {
    fn insert_proof(&self, record: &ProofRecord) -> Result<ProofInsert, StoreError> {
        let face = record.face_hash().as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if let Some(existing) = self.proofs_db.get(&wtxn, face).map_err(LmdbError::from)? {
            let existing: ProofRecord = decode(existing)?;
            debug!(face = %record.face_hash().short(), "face hash already committed");
            return Ok(ProofInsert::Exists(existing));
        }
        let bytes = encode(record)?;
        self.proofs_db
            .put(&mut wtxn, face, &bytes)
            .map_err(LmdbError::from)?;
        self.tx_index_db
            .put(&mut wtxn, record.tx_id.as_bytes(), face)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(ProofInsert::Inserted)
    }

    fn get_by_face_hash(&self, face: &FaceHash) -> Result<Option<ProofRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .proofs_db
            .get(&rtxn, face.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn get_by_tx(&self, tx_id: &TxId) -> Result<Option<ProofRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(face) = self
            .tx_index_db
            .get(&rtxn, tx_id.as_bytes())
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        let bytes = self
            .proofs_db
            .get(&rtxn, face)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                StoreError::Corruption(format!("tx {} indexes a missing proof", tx_id.short()))
            })?;
        Ok(Some(decode(bytes)?))
    }

    fn proof_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.proofs_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
