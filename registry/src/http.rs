//! Remote ledger over HTTP/JSON.
//!
//! - `POST {base}/v1/ledger/proofs` with a `SignedProof` body. `201` returns
//!   the committed `ProofRecord`; `409` returns `{"tx_id": ...}` of the
//!   existing commit.
//! - `GET {base}/v1/ledger/proofs/face/{hex}`. `200` returns the record,
//!   `404` means no commit for that face hash.

use std::time::Duration;

use armor_types::{FaceHash, ProofRecord, SignedProof, TxId};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::{LedgerBackend, LedgerError};

/// Body of a `409 Conflict` answer.
#[derive(Debug, Deserialize)]
struct ConflictBody {
    tx_id: TxId,
}

#[derive(Clone, Debug)]
pub struct HttpLedger {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpLedger {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn transport_error(e: reqwest::Error) -> LedgerError {
    LedgerError::Unavailable(e.to_string())
}

/// Map a non-success status to a ledger error.
fn status_error(status: StatusCode, body: &str) -> LedgerError {
    if status == StatusCode::CONFLICT {
        return match serde_json::from_str::<ConflictBody>(body) {
            Ok(c) => LedgerError::Conflict { tx_id: c.tx_id },
            Err(e) => LedgerError::Rejected(format!("conflict without tx id: {e}")),
        };
    }
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        return LedgerError::Unavailable(format!("HTTP {status}"));
    }
    LedgerError::Rejected(format!("HTTP {status}: {}", body.trim()))
}

#[async_trait]
impl LedgerBackend for HttpLedger {
    async fn submit(&self, proof: &SignedProof) -> Result<ProofRecord, LedgerError> {
        let url = format!("{}/v1/ledger/proofs", self.base_url);
        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(proof)
            .send()
            .await
            .map_err(transport_error)?;
        let status = resp.status();
        debug!(%url, %status, "ledger submit");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        resp.json().await.map_err(|e| {
            LedgerError::Unavailable(format!("malformed submit response: {e}"))
        })
    }

    async fn query_by_face_hash(&self, face: &FaceHash) -> Result<Option<ProofRecord>, LedgerError> {
        let url = format!("{}/v1/ledger/proofs/face/{}", self.base_url, face.to_hex());
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;
        let status = resp.status();
        debug!(%url, %status, "ledger query");
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        resp.json().await.map(Some).map_err(|e| {
            LedgerError::Unavailable(format!("malformed query response: {e}"))
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
