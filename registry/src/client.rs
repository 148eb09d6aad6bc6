//! Retrying, cancellable registry client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use armor_crypto::verify_proof_signature;
use armor_types::{FaceHash, ProofRecord, SignedProof};
use tracing::{debug, warn};

use crate::{CancelSignal, LedgerBackend, LedgerError, RegistryError, RetryPolicy};

/// Called once per retry with the operation name.
pub type RetryHook = Arc<dyn Fn(&'static str) + Send + Sync>;

/// Registry access with retries on unavailability.
///
/// Only [`LedgerError::Unavailable`] and per-attempt timeouts are retried.
/// Conflicts, rejections and store failures end the call at once. Cancellation is observed
/// while an attempt is in flight and while backing off.
#[derive(Clone)]
pub struct RegistryClient {
    backend: Arc<dyn LedgerBackend>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    on_retry: Option<RetryHook>,
}

impl RegistryClient {
    pub fn new(backend: Arc<dyn LedgerBackend>, policy: RetryPolicy, attempt_timeout: Duration) -> Self {
        Self {
            backend,
            policy,
            attempt_timeout,
            on_retry: None,
        }
    }

    pub fn with_retry_hook(mut self, hook: RetryHook) -> Self {
        self.on_retry = Some(hook);
        self
    }

    pub fn backend(&self) -> &Arc<dyn LedgerBackend> {
        &self.backend
    }

    /// Commit a signed proof. Returns the committed record with its tx id.
    pub async fn register(
        &self,
        proof: &SignedProof,
        cancel: &CancelSignal,
    ) -> Result<ProofRecord, RegistryError> {
        let record = self
            .with_retry("register", cancel, || self.backend.submit(proof))
            .await?;
        if record.data != proof.data || record.signature != proof.signature {
            return Err(RegistryError::InvalidRecord(format!(
                "ledger committed a different proof under tx {}",
                record.tx_id.short()
            )));
        }
        if record.tx_id.is_zero() {
            return Err(RegistryError::InvalidRecord("zero transaction id".into()));
        }
        Ok(record)
    }

    /// Look up the committed proof for a face hash.
    ///
    /// `Ok(None)` means the ledger answered and has no such record. An
    /// unreachable ledger is always an error, never `None`.
    pub async fn lookup_by_face_hash(
        &self,
        face: &FaceHash,
        cancel: &CancelSignal,
    ) -> Result<Option<ProofRecord>, RegistryError> {
        let found = self
            .with_retry("lookup", cancel, || self.backend.query_by_face_hash(face))
            .await?;
        let Some(record) = found else {
            return Ok(None);
        };
        if record.face_hash() != face {
            return Err(RegistryError::InvalidRecord(format!(
                "asked for face {} and got {}",
                face.short(),
                record.face_hash().short()
            )));
        }
        if !verify_proof_signature(&record.to_signed()) {
            return Err(RegistryError::InvalidRecord(format!(
                "signature of tx {} does not verify for wallet {}",
                record.tx_id.short(),
                record.data.wallet
            )));
        }
        Ok(Some(record))
    }

    async fn with_retry<T, F, Fut>(
        &self,
        op: &'static str,
        cancel: &CancelSignal,
        mut call: F,
    ) -> Result<T, RegistryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LedgerError>>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                return Err(RegistryError::Cancelled);
            }
            debug!(op, attempt, backend = self.backend.name(), "registry attempt");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RegistryError::Cancelled),
                r = tokio::time::timeout(self.attempt_timeout, call()) => r,
            };
            match outcome {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(LedgerError::Unavailable(msg))) => last_error = msg,
                Ok(Err(LedgerError::Conflict { tx_id })) => {
                    return Err(RegistryError::AlreadyRegistered { tx_id })
                }
                Ok(Err(LedgerError::Rejected(msg))) => return Err(RegistryError::Rejected(msg)),
                Ok(Err(LedgerError::Internal(msg))) => return Err(RegistryError::Internal(msg)),
                Err(_) => {
                    last_error = format!("attempt timed out after {:?}", self.attempt_timeout)
                }
            }

            if attempt == max_attempts {
                break;
            }
            let delay = self.policy.delay_for_retry(attempt - 1);
            warn!(op, attempt, ?delay, error = %last_error, "registry unavailable, retrying");
            if let Some(hook) = &self.on_retry {
                hook(op);
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RegistryError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        Err(RegistryError::Unavailable {
            attempts: max_attempts,
            last_error,
        })
    }
}
