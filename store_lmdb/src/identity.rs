//! LMDB implementation of IdentityStore.

use armor_store::{IdentityStore, StoreError};
use armor_types::IdentityRecord;

use crate::{decode, encode, LmdbError, LmdbStore};

impl IdentityStore for LmdbStore {
    fn put_identity(&self, identity: &IdentityRecord) -> Result<(), StoreError> {
        let bytes = encode(identity)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.identities_db
            .put(&mut wtxn, identity.id.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_identity(&self, id: &str) -> Result<Option<IdentityRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .identities_db
            .get(&rtxn, id.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn list_identities(&self) -> Result<Vec<IdentityRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for entry in self.identities_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            out.push(decode(val)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_types::{Timestamp, TrustScore};

    #[test]
    fn put_get_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();
        let identity = IdentityRecord {
            id: "id-elena".into(),
            name: "Elena Vance".into(),
            registry_tx: None,
            verified_at: Timestamp::new(1),
            trust_score: TrustScore::new(98).unwrap(),
        };
        store.put_identity(&identity).unwrap();
        assert_eq!(store.get_identity("id-elena").unwrap(), Some(identity.clone()));
        assert_eq!(store.get_identity("nobody").unwrap(), None);
        assert_eq!(store.list_identities().unwrap(), vec![identity]);
    }
}
