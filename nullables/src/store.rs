//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use armor_store::{
    AlertStore, AllowlistStore, IdentityStore, ProofInsert, ProofStore, ScanStore, StoreError,
};
use armor_types::{
    Alert, AlertId, AlertTransition, ContentHash, FaceHash, IdentityRecord, ProofRecord,
    ScanEvent, TxId, VerifiedImage,
};

/// An in-memory implementation of every store trait.
///
/// Each trait's data sits behind its own mutex, which also serialises
/// check-and-insert the way an LMDB write transaction does.
#[derive(Default)]
pub struct NullStore {
    proofs: Mutex<HashMap<FaceHash, ProofRecord>>,
    tx_index: Mutex<HashMap<TxId, FaceHash>>,
    identities: Mutex<BTreeMap<String, IdentityRecord>>,
    alerts: Mutex<BTreeMap<AlertId, (Alert, Vec<AlertTransition>)>>,
    scans: Mutex<Vec<ScanEvent>>,
    allowlist: Mutex<BTreeMap<ContentHash, VerifiedImage>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProofStore for NullStore {
    fn insert_proof(&self, record: &ProofRecord) -> Result<ProofInsert, StoreError> {
        let mut proofs = lock(&self.proofs);
        if let Some(existing) = proofs.get(record.face_hash()) {
            return Ok(ProofInsert::Exists(existing.clone()));
        }
        proofs.insert(*record.face_hash(), record.clone());
        lock(&self.tx_index).insert(record.tx_id, *record.face_hash());
        Ok(ProofInsert::Inserted)
    }

    fn get_by_face_hash(&self, face: &FaceHash) -> Result<Option<ProofRecord>, StoreError> {
        Ok(lock(&self.proofs).get(face).cloned())
    }

    fn get_by_tx(&self, tx_id: &TxId) -> Result<Option<ProofRecord>, StoreError> {
        let Some(face) = lock(&self.tx_index).get(tx_id).copied() else {
            return Ok(None);
        };
        Ok(lock(&self.proofs).get(&face).cloned())
    }

    fn proof_count(&self) -> Result<u64, StoreError> {
        Ok(lock(&self.proofs).len() as u64)
    }
}

impl IdentityStore for NullStore {
    fn put_identity(&self, identity: &IdentityRecord) -> Result<(), StoreError> {
        lock(&self.identities).insert(identity.id.clone(), identity.clone());
        Ok(())
    }

    fn get_identity(&self, id: &str) -> Result<Option<IdentityRecord>, StoreError> {
        Ok(lock(&self.identities).get(id).cloned())
    }

    fn list_identities(&self) -> Result<Vec<IdentityRecord>, StoreError> {
        Ok(lock(&self.identities).values().cloned().collect())
    }
}

impl AlertStore for NullStore {
    fn insert_alert(&self, alert: &Alert) -> Result<bool, StoreError> {
        let mut alerts = lock(&self.alerts);
        if alerts.contains_key(&alert.id) {
            return Ok(false);
        }
        alerts.insert(alert.id.clone(), (alert.clone(), Vec::new()));
        Ok(true)
    }

    fn get_alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError> {
        Ok(lock(&self.alerts).get(id).map(|(a, _)| a.clone()))
    }

    fn update_alert(&self, alert: &Alert, transition: &AlertTransition) -> Result<(), StoreError> {
        let mut alerts = lock(&self.alerts);
        let (stored, history) = alerts
            .get_mut(&alert.id)
            .ok_or_else(|| StoreError::NotFound(format!("alert {}", alert.id)))?;
        *stored = alert.clone();
        history.push(transition.clone());
        Ok(())
    }

    fn list_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(lock(&self.alerts).values().map(|(a, _)| a.clone()).collect())
    }

    fn transitions(&self, id: &AlertId) -> Result<Vec<AlertTransition>, StoreError> {
        Ok(lock(&self.alerts)
            .get(id)
            .map(|(_, h)| h.clone())
            .unwrap_or_default())
    }
}

impl ScanStore for NullStore {
    fn append_scan(&self, mut event: ScanEvent) -> Result<ScanEvent, StoreError> {
        let mut scans = lock(&self.scans);
        event.scan_id = ScanEvent::id_for(scans.len() as u64);
        scans.push(event.clone());
        Ok(event)
    }

    fn scans(&self) -> Result<Vec<ScanEvent>, StoreError> {
        Ok(lock(&self.scans).clone())
    }

    fn scan_count(&self) -> Result<u64, StoreError> {
        Ok(lock(&self.scans).len() as u64)
    }
}

impl AllowlistStore for NullStore {
    fn add_verified(&self, image: &VerifiedImage) -> Result<(), StoreError> {
        lock(&self.allowlist)
            .entry(image.content_hash)
            .or_insert_with(|| image.clone());
        Ok(())
    }

    fn is_verified(&self, content: &ContentHash) -> Result<bool, StoreError> {
        Ok(lock(&self.allowlist).contains_key(content))
    }

    fn verified_images(&self) -> Result<Vec<VerifiedImage>, StoreError> {
        Ok(lock(&self.allowlist).values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_types::{ProofData, Signature, Timestamp, WalletAddress, WatermarkHash};

    fn record(face: u8, tx: u8) -> ProofRecord {
        ProofRecord {
            data: ProofData {
                face_hash: FaceHash::new([face; 32]),
                content_hash: ContentHash::new([1; 32]),
                watermark_hash: WatermarkHash::ZERO,
                wallet: WalletAddress::parse("carm_null").unwrap(),
                timestamp: Timestamp::new(1),
            },
            signature: Signature([0; 64]),
            tx_id: TxId::new([tx; 32]),
        }
    }

    #[test]
    fn first_writer_wins() {
        let store = NullStore::new();
        assert_eq!(store.insert_proof(&record(1, 1)).unwrap(), ProofInsert::Inserted);
        assert_eq!(
            store.insert_proof(&record(1, 2)).unwrap(),
            ProofInsert::Exists(record(1, 1))
        );
        assert_eq!(store.get_by_tx(&TxId::new([2; 32])).unwrap(), None);
        assert_eq!(store.get_by_tx(&TxId::new([1; 32])).unwrap(), Some(record(1, 1)));
    }

    #[test]
    fn concurrent_inserts_commit_once() {
        let store = std::sync::Arc::new(NullStore::new());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.insert_proof(&record(9, i)).unwrap())
            })
            .collect();
        let inserted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| *r == ProofInsert::Inserted)
            .count();
        assert_eq!(inserted, 1);
        assert_eq!(store.proof_count().unwrap(), 1);
    }
}
