//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::{RpcError, RpcState};

/// Every route the node serves.
pub fn router(state: RpcState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/v1/ledger/proofs", post(handlers::ledger_submit))
        .route("/v1/ledger/proofs/face/:hash", get(handlers::ledger_query))
        .route("/v1/proofs", post(handlers::register_proof))
        .route("/v1/verify", post(handlers::verify))
        .route("/v1/identities", post(handlers::put_identity))
        .route("/v1/identities/:id", get(handlers::get_identity))
        .route(
            "/v1/alerts",
            get(handlers::list_alerts).post(handlers::ingest_alert),
        )
        .route("/v1/alerts/:id/resolve", post(handlers::resolve_alert))
        .route("/v1/alerts/:id/escalate", post(handlers::escalate_alert))
        .route("/v1/alerts/:id/defend", post(handlers::defend_alert))
        .route("/v1/moderation/report", post(handlers::moderation_report))
        .route("/v1/allowlist", post(handlers::add_allowlist))
        .route("/v1/analytics", get(handlers::analytics))
        .route("/v1/analytics/scans", get(handlers::scan_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct RpcServer {
    pub port: u16,
    pub state: RpcState,
}

impl RpcServer {
    pub fn new(port: u16, state: RpcState) -> Self {
        Self { port, state }
    }

    /// Bind to `0.0.0.0:{port}` and serve until `shutdown` resolves.
    pub async fn start<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(("0.0.0.0", self.port))
            .await
            .map_err(|e| RpcError::Server(format!("bind port {}: {e}", self.port)))?;
        serve(listener, self.state, shutdown).await
    }
}

/// Serve on an already bound listener. Tests bind port 0 and read the
/// address back.
pub async fn serve<F>(listener: TcpListener, state: RpcState, shutdown: F) -> Result<(), RpcError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    info!(?addr, "RPC server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RpcError::Server(e.to_string()))?;
    info!("RPC server stopped");
    Ok(())
}
