//! RPC error types and their HTTP mapping.

use armor_defense::DefenseError;
use armor_hashing::HashingError;
use armor_registry::{LedgerError, RegistryError};
use armor_store::StoreError;
use armor_types::{ArmorError, TxId};
use armor_verification::VerifyError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("face hash already registered in tx {tx_id}")]
    AlreadyRegistered { tx_id: TxId },

    #[error("registry unavailable: {0}")]
    Unavailable(String),

    #[error("server error: {0}")]
    Server(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tx_id: Option<TxId>,
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyRegistered { .. } => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "request failed");
        }
        let tx_id = match &self {
            Self::AlreadyRegistered { tx_id } => Some(*tx_id),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            tx_id,
        };
        (status, Json(body)).into_response()
    }
}

impl From<HashingError> for RpcError {
    fn from(e: HashingError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

impl From<ArmorError> for RpcError {
    fn from(e: ArmorError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

impl From<StoreError> for RpcError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => RpcError::NotFound(key),
            other => RpcError::Server(other.to_string()),
        }
    }
}

impl From<LedgerError> for RpcError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Conflict { tx_id } => RpcError::AlreadyRegistered { tx_id },
            LedgerError::Rejected(msg) => RpcError::InvalidRequest(msg),
            LedgerError::Unavailable(msg) => RpcError::Unavailable(msg),
            LedgerError::Internal(msg) => RpcError::Server(msg),
        }
    }
}

impl From<RegistryError> for RpcError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::AlreadyRegistered { tx_id } => RpcError::AlreadyRegistered { tx_id },
            RegistryError::Rejected(msg) => RpcError::InvalidRequest(msg),
            RegistryError::Internal(msg) => RpcError::Server(msg),
            other => RpcError::Unavailable(other.to_string()),
        }
    }
}

impl From<VerifyError> for RpcError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Hashing(e) => e.into(),
            VerifyError::Registry(e) => e.into(),
        }
    }
}

impl From<DefenseError> for RpcError {
    fn from(e: DefenseError) -> Self {
        match e {
            DefenseError::UnknownAlert(id) => RpcError::NotFound(format!("alert {id}")),
            DefenseError::UnknownIdentity(id) => RpcError::NotFound(format!("identity {id}")),
            DefenseError::Invalid(e) => e.into(),
            DefenseError::Store(e) => e.into(),
        }
    }
}
