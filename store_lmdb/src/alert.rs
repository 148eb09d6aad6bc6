//! LMDB implementation of AlertStore.
//!
//! History entries use composite keys `len(alert_id) ‖ alert_id ‖ seq` so one
//! alert's history is a contiguous prefix range in insertion order, and no id
//! can fall inside another id's range.

use std::ops::Bound;

use armor_store::{AlertStore, StoreError};
use armor_types::{Alert, AlertId, AlertTransition};
use heed::RoTxn;

use crate::{decode, encode, increment_prefix, LmdbError, LmdbStore};

fn history_prefix(id: &AlertId) -> Vec<u8> {
    let id = id.as_str().as_bytes();
    let mut key = Vec::with_capacity(4 + id.len() + 4);
    key.extend_from_slice(&(id.len() as u32).to_be_bytes());
    key.extend_from_slice(id);
    key
}

impl LmdbStore {
    fn history_in(&self, txn: &RoTxn, id: &AlertId) -> Result<Vec<AlertTransition>, LmdbError> {
        let prefix = history_prefix(id);
        let mut upper = prefix.clone();
        increment_prefix(&mut upper);
        let bounds = (
            Bound::Included(prefix.as_slice()),
            Bound::Excluded(upper.as_slice()),
        );
        let mut out = Vec::new();
        for entry in self.alert_history_db.range(txn, &bounds)? {
            let (_key, val) = entry?;
            out.push(decode(val)?);
        }
        Ok(out)
    }
}

impl AlertStore for LmdbStore {
    fn insert_alert(&self, alert: &Alert) -> Result<bool, StoreError> {
        let key = alert.id.as_str().as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .alerts_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Ok(false);
        }
        let bytes = encode(alert)?;
        self.alerts_db
            .put(&mut wtxn, key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }

    fn get_alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .alerts_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn update_alert(&self, alert: &Alert, transition: &AlertTransition) -> Result<(), StoreError> {
        let key = alert.id.as_str().as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .alerts_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_none()
        {
            return Err(StoreError::NotFound(format!("alert {}", alert.id)));
        }
        let seq = self.history_in(&wtxn, &alert.id)?.len() as u32;
        let mut history_key = history_prefix(&alert.id);
        history_key.extend_from_slice(&seq.to_be_bytes());

        let alert_bytes = encode(alert)?;
        let transition_bytes = encode(transition)?;
        self.alerts_db
            .put(&mut wtxn, key, &alert_bytes)
            .map_err(LmdbError::from)?;
        self.alert_history_db
            .put(&mut wtxn, &history_key, &transition_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn list_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for entry in self.alerts_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            out.push(decode(val)?);
        }
        Ok(out)
    }

    fn transitions(&self, id: &AlertId) -> Result<Vec<AlertTransition>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.history_in(&rtxn, id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_types::{AlertSource, AlertStatus, Confidence, Platform, Timestamp};

    fn alert(id: &str) -> Alert {
        Alert {
            id: AlertId::new(id),
            platform: Platform::Instagram,
            source: AlertSource::PlatformReport,
            location: Some("https://instagram.com/p/xyz".into()),
            content_hash: None,
            detected_at: Timestamp::new(10),
            confidence: Confidence::new(88.0).unwrap(),
            status: AlertStatus::Pending,
            reason: None,
        }
    }

    #[test]
    fn insert_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();
        assert!(store.insert_alert(&alert("AL-1")).unwrap());
        assert!(!store.insert_alert(&alert("AL-1")).unwrap());
        assert_eq!(store.list_alerts().unwrap().len(), 1);
    }

    #[test]
    fn update_appends_history_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();
        let mut a = alert("AL-1");
        store.insert_alert(&a).unwrap();
        store.insert_alert(&alert("AL-10")).unwrap();

        let t1 = a.transition(AlertStatus::Active, Timestamp::new(11)).unwrap();
        store.update_alert(&a, &t1).unwrap();
        let t2 = a.transition(AlertStatus::Resolved, Timestamp::new(12)).unwrap();
        store.update_alert(&a, &t2).unwrap();

        assert_eq!(store.transitions(&a.id).unwrap(), vec![t1, t2]);
        assert!(store.transitions(&AlertId::new("AL-10")).unwrap().is_empty());
        assert_eq!(
            store.get_alert(&a.id).unwrap().map(|a| a.status),
            Some(AlertStatus::Resolved)
        );
    }

    #[test]
    fn history_ranges_do_not_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();
        store.insert_alert(&alert("AL-1")).unwrap();
        let mut other = alert("AL-1\u{0}x");
        store.insert_alert(&other).unwrap();

        let t = other.transition(AlertStatus::Resolved, Timestamp::new(11)).unwrap();
        store.update_alert(&other, &t).unwrap();

        assert!(store.transitions(&AlertId::new("AL-1")).unwrap().is_empty());
        assert_eq!(store.transitions(&other.id).unwrap(), vec![t]);

        let mut first = alert("AL-1");
        let t1 = first.transition(AlertStatus::Active, Timestamp::new(12)).unwrap();
        store.update_alert(&first, &t1).unwrap();
        assert_eq!(store.transitions(&first.id).unwrap(), vec![t1]);
        assert_eq!(store.transitions(&other.id).unwrap().len(), 1);
    }

    #[test]
    fn update_of_unknown_alert_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();
        let mut a = alert("AL-2");
        let t = a.transition(AlertStatus::Active, Timestamp::new(1)).unwrap();
        assert!(matches!(store.update_alert(&a, &t), Err(StoreError::NotFound(_))));
    }
}
