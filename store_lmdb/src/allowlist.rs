//! LMDB implementation of AllowlistStore.

use armor_store::{AllowlistStore, StoreError};
use armor_types::{ContentHash, VerifiedImage};

use crate::{decode, encode, LmdbError, LmdbStore};

impl AllowlistStore for LmdbStore {
    fn add_verified(&self, image: &VerifiedImage) -> Result<(), StoreError> {
        let key = image.content_hash.as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .allowlist_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Ok(());
        }
        let bytes = encode(image)?;
        self.allowlist_db
            .put(&mut wtxn, key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn is_verified(&self, content: &ContentHash) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .allowlist_db
            .get(&rtxn, content.as_bytes())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn verified_images(&self) -> Result<Vec<VerifiedImage>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for entry in self.allowlist_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            out.push(decode(val)?);
        }
        Ok(out)
    }
}
