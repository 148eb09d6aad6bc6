use std::sync::Arc;

use armor_defense::DefenseOrchestrator;
use armor_registry::{CancelSignal, StoreLedger};
use armor_store::ArmorStore;
use armor_types::{Clock, KeyPair};
use armor_verification::VerificationEngine;
use prometheus::Registry;

use crate::{ApiObserver, NoopObserver};

/// Everything the handlers share. Cheap to clone.
#[derive(Clone)]
pub struct RpcState {
    pub engine: VerificationEngine,
    pub defense: DefenseOrchestrator,
    pub store: Arc<dyn ArmorStore>,
    /// Serves the ledger endpoints from this node's own proof store.
    pub ledger: Arc<StoreLedger>,
    /// Signs proofs registered through `POST /v1/proofs`.
    pub wallet: Arc<KeyPair>,
    pub clock: Arc<dyn Clock>,
    /// Cancelled when the node shuts down.
    pub cancel: CancelSignal,
    pub observer: Arc<dyn ApiObserver>,
    /// Exposed at `/metrics` when set.
    pub metrics: Option<Registry>,
}

impl RpcState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: VerificationEngine,
        defense: DefenseOrchestrator,
        store: Arc<dyn ArmorStore>,
        ledger: Arc<StoreLedger>,
        wallet: Arc<KeyPair>,
        clock: Arc<dyn Clock>,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            engine,
            defense,
            store,
            ledger,
            wallet,
            clock,
            cancel,
            observer: Arc::new(NoopObserver),
            metrics: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ApiObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_metrics(mut self, registry: Registry) -> Self {
        self.metrics = Some(registry);
        self
    }
}
