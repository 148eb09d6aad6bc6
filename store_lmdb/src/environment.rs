//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::LmdbError;

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

const DATABASES: u32 = 7;

/// An open LMDB environment.
pub struct LmdbEnvironment {
    env: Arc<Env>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per directory per process;
        // the node owns the data directory exclusively.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs.max(DATABASES))
                .open(path)?
        };
        info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self { env: Arc::new(env) })
    }

    /// Create (if needed) every named database and return the store handle.
    pub fn store(&self) -> Result<LmdbStore, LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        let store = LmdbStore {
            env: Arc::clone(&self.env),
            proofs_db: self.env.create_database(&mut wtxn, Some("proofs"))?,
            tx_index_db: self.env.create_database(&mut wtxn, Some("proof_tx_index"))?,
            identities_db: self.env.create_database(&mut wtxn, Some("identities"))?,
            alerts_db: self.env.create_database(&mut wtxn, Some("alerts"))?,
            alert_history_db: self.env.create_database(&mut wtxn, Some("alert_history"))?,
            scans_db: self.env.create_database(&mut wtxn, Some("scans"))?,
            allowlist_db: self.env.create_database(&mut wtxn, Some("allowlist"))?,
        };
        wtxn.commit()?;
        Ok(store)
    }
}

/// All CreativeArmor databases within one environment.
///
/// Layout:
/// - `proofs`: face hash → `ProofRecord`
/// - `proof_tx_index`: tx id → face hash
/// - `identities`: identity id → `IdentityRecord`
/// - `alerts`: alert id → `Alert`
/// - `alert_history`: alert id ‖ 0x00 ‖ seq (u32 BE) → `AlertTransition`
/// - `scans`: seq (u64 BE) → `ScanEvent`
/// - `allowlist`: content hash → `VerifiedImage`
#[derive(Clone)]
pub struct LmdbStore {
    pub(crate) env: Arc<Env>,
    pub(crate) proofs_db: Database<Bytes, Bytes>,
    pub(crate) tx_index_db: Database<Bytes, Bytes>,
    pub(crate) identities_db: Database<Bytes, Bytes>,
    pub(crate) alerts_db: Database<Bytes, Bytes>,
    pub(crate) alert_history_db: Database<Bytes, Bytes>,
    pub(crate) scans_db: Database<Bytes, Bytes>,
    pub(crate) allowlist_db: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open the environment at `path` with default sizing and return its store.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        LmdbEnvironment::open(path, DATABASES, DEFAULT_MAP_SIZE)?.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_directory_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db");
        LmdbStore::open(&path).unwrap();
        assert!(path.exists());
    }
}
