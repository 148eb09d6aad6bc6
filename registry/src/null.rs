//! Nullable ledger: a scriptable in-memory backend for tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use armor_nullables::NullStore;
use armor_types::{FaceHash, ProofRecord, SignedProof};
use async_trait::async_trait;

use crate::{LedgerBackend, LedgerError, StoreLedger};

/// An in-memory ledger whose availability can be scripted.
///
/// Commits behave exactly like [`StoreLedger`]. On top of that the next `n`
/// calls can be made to fail as unavailable, and every call can be delayed.
pub struct NullLedger {
    inner: StoreLedger,
    store: Arc<NullStore>,
    failures_left: AtomicU32,
    calls: AtomicU32,
    latency: Mutex<Duration>,
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl NullLedger {
    pub fn new() -> Self {
        let store = Arc::new(NullStore::new());
        Self {
            inner: StoreLedger::new(store.clone()),
            store,
            failures_left: AtomicU32::new(0),
            calls: AtomicU32::new(0),
            latency: Mutex::new(Duration::ZERO),
        }
    }

    /// Make the next `n` calls fail with `Unavailable`.
    pub fn fail_next(&self, n: u32) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    /// Fail every call until `fail_next(0)`.
    pub fn go_offline(&self) {
        self.fail_next(u32::MAX);
    }

    /// Delay every call by `latency` before answering.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|p| p.into_inner()) = latency;
    }

    /// Calls received so far, including failed ones.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// The backing store, for seeding or inspection.
    pub fn store(&self) -> &Arc<NullStore> {
        &self.store
    }

    async fn gate(&self) -> Result<(), LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap_or_else(|p| p.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                0 => None,
                u32::MAX => Some(u32::MAX),
                n => Some(n - 1),
            })
            .is_ok();
        if failing {
            return Err(LedgerError::Unavailable("null ledger scripted outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerBackend for NullLedger {
    async fn submit(&self, proof: &SignedProof) -> Result<ProofRecord, LedgerError> {
        self.gate().await?;
        self.inner.submit(proof).await
    }

    async fn query_by_face_hash(&self, face: &FaceHash) -> Result<Option<ProofRecord>, LedgerError> {
        self.gate().await?;
        self.inner.query_by_face_hash(face).await
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_failures_then_recovery() {
        let ledger = NullLedger::new();
        ledger.fail_next(2);
        let face = FaceHash::new([1; 32]);
        assert!(ledger.query_by_face_hash(&face).await.is_err());
        assert!(ledger.query_by_face_hash(&face).await.is_err());
        assert_eq!(ledger.query_by_face_hash(&face).await, Ok(None));
        assert_eq!(ledger.calls(), 3);
    }

    #[tokio::test]
    async fn offline_until_reset() {
        let ledger = NullLedger::new();
        ledger.go_offline();
        let face = FaceHash::new([1; 32]);
        for _ in 0..5 {
            assert!(ledger.query_by_face_hash(&face).await.is_err());
        }
        ledger.fail_next(0);
        assert!(ledger.query_by_face_hash(&face).await.is_ok());
    }
}
