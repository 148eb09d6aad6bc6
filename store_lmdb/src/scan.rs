//! LMDB implementation of ScanStore. Keys are big-endian sequence numbers.

use armor_store::{ScanStore, StoreError};
use armor_types::ScanEvent;

use crate::{decode, encode, LmdbError, LmdbStore};

impl ScanStore for LmdbStore {
    fn append_scan(&self, mut event: ScanEvent) -> Result<ScanEvent, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let seq = self.scans_db.len(&wtxn).map_err(LmdbError::from)?;
        event.scan_id = ScanEvent::id_for(seq);
        let bytes = encode(&event)?;
        self.scans_db
            .put(&mut wtxn, &seq.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(event)
    }

    fn scans(&self) -> Result<Vec<ScanEvent>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for entry in self.scans_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            out.push(decode(val)?);
        }
        Ok(out)
    }

    fn scan_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.scans_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
