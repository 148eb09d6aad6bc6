//! HTTP API for a CreativeArmor node.
//!
//! Provides endpoints for:
//! - The ledger role: committing and querying signed proofs
//! - Registering and verifying images
//! - Identities, alerts, moderation reports and the allowlist
//! - Scan analytics, health and Prometheus metrics

pub mod error;
pub mod handlers;
pub mod observer;
pub mod server;
pub mod state;

pub use error::RpcError;
pub use observer::{ApiObserver, NoopObserver};
pub use server::{router, serve, RpcServer};
pub use state::RpcState;
