//! Proof registry client.
//!
//! A [`LedgerBackend`] commits signed proofs and answers face-hash queries.
//! [`StoreLedger`] is a local append-only ledger over a [`armor_store::ProofStore`];
//! [`HttpLedger`] talks to a remote ledger node. [`RegistryClient`] wraps
//! either with retries, per-attempt timeouts and cancellation, and checks the
//! signature of every record it hands back.

pub mod backend;
pub mod cancel;
pub mod client;
pub mod error;
pub mod http;
pub mod local;
pub mod null;
pub mod retry;

pub use backend::LedgerBackend;
pub use cancel::{CancelHandle, CancelSignal};
pub use client::{RegistryClient, RetryHook};
pub use error::{LedgerError, RegistryError};
pub use http::HttpLedger;
pub use local::StoreLedger;
pub use null::NullLedger;
pub use retry::RetryPolicy;
