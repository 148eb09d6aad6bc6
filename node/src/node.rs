//! The node: owns the store, wallet, metrics and shutdown, and serves the API.

use std::sync::Arc;
use std::time::Duration;

use armor_crypto::derive_address;
use armor_defense::{AlertBook, DefenseOrchestrator, HttpTextGenerator, NoticeDrafter, ScanLog};
use armor_registry::{HttpLedger, LedgerBackend, RegistryClient, StoreLedger};
use armor_rpc::{RpcServer, RpcState};
use armor_store::ArmorStore;
use armor_store_lmdb::LmdbStore;
use armor_types::{Clock, SystemClock, WalletAddress};
use armor_verification::VerificationEngine;
use tokio::net::TcpListener;
use tracing::info;

use crate::wallet::load_or_create_wallet;
use crate::{NodeConfig, NodeError, NodeMetrics, ShutdownController};

pub struct ArmorNode {
    pub config: NodeConfig,
    pub store: Arc<LmdbStore>,
    pub metrics: Arc<NodeMetrics>,
    pub shutdown: Arc<ShutdownController>,
    wallet_address: WalletAddress,
    state: RpcState,
}

impl ArmorNode {
    /// Open storage, load the wallet and wire every service.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        let store = Arc::new(LmdbStore::open(&config.store_path())?);
        let wallet = Arc::new(load_or_create_wallet(&config.wallet_key_path())?);
        let wallet_address = derive_address(&wallet.public);
        let metrics = Arc::new(NodeMetrics::new()?);
        let shutdown = Arc::new(ShutdownController::new());

        let local_ledger = Arc::new(StoreLedger::new(store.clone()));
        let backend: Arc<dyn LedgerBackend> = match &config.ledger_url {
            Some(url) => Arc::new(HttpLedger::new(url, config.ledger_timeout())),
            None => local_ledger.clone(),
        };
        let registry = RegistryClient::new(backend, config.retry.clone(), config.ledger_timeout())
            .with_retry_hook(metrics.retry_hook());

        let engine = VerificationEngine::new(config.detector.hasher(), registry);

        let drafter = match &config.generator.endpoint {
            Some(endpoint) => {
                let g = &config.generator;
                let timeout = Duration::from_millis(g.timeout_ms);
                let api_key = std::env::var(&g.api_key_env).ok();
                let generator = HttpTextGenerator::new(endpoint, &g.model, api_key, timeout);
                NoticeDrafter::with_generator(Arc::new(generator), g.min_notice_len, timeout)
            }
            None => NoticeDrafter::template_only(),
        };

        let shared: Arc<dyn ArmorStore> = store.clone();
        let defense = DefenseOrchestrator::new(
            AlertBook::new(shared.clone(), clock.clone()),
            drafter,
            ScanLog::new(store.clone()),
            store.clone(),
            config.explorer_base_url.clone(),
        );

        let mut state = RpcState::new(
            engine,
            defense,
            shared,
            local_ledger,
            wallet,
            clock,
            shutdown.cancel_signal(),
        )
        .with_observer(metrics.clone());
        if config.enable_metrics {
            state = state.with_metrics(metrics.registry.clone());
        }

        info!(
            data_dir = %config.data_dir.display(),
            wallet = %wallet_address,
            ledger = config.ledger_url.as_deref().unwrap_or("local"),
            generator = config.generator.endpoint.as_deref().unwrap_or("template"),
            "node initialised"
        );

        Ok(Self {
            config,
            store,
            metrics,
            shutdown,
            wallet_address,
            state,
        })
    }

    pub fn wallet_address(&self) -> &WalletAddress {
        &self.wallet_address
    }

    pub fn state(&self) -> &RpcState {
        &self.state
    }

    /// Serve on the configured port until SIGINT/SIGTERM or [`Self::stop`].
    pub async fn run(&self) -> Result<(), NodeError> {
        let signals = Arc::clone(&self.shutdown);
        tokio::spawn(async move { signals.wait_for_signal().await });

        if self.config.enable_rpc {
            info!(port = self.config.rpc_port, "starting RPC server");
            RpcServer::new(self.config.rpc_port, self.state.clone())
                .start(self.shutdown.notified())
                .await?;
        } else {
            self.shutdown.notified().await;
        }
        info!("node stopped");
        Ok(())
    }

    /// Serve on an already bound listener until [`Self::stop`].
    pub async fn serve(&self, listener: TcpListener) -> Result<(), NodeError> {
        armor_rpc::serve(listener, self.state.clone(), self.shutdown.notified()).await?;
        Ok(())
    }

    pub fn stop(&self) {
        info!("stopping node");
        self.shutdown.shutdown();
    }
}
