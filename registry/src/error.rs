use armor_store::StoreError;
use armor_types::TxId;
use thiserror::Error;

/// Failure of a single ledger call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Transient: connection failure, timeout, 5xx, backend I/O.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The face hash is already committed under `tx_id`.
    #[error("face hash already registered in tx {tx_id}")]
    Conflict { tx_id: TxId },

    /// The ledger refused the request; retrying will not help.
    #[error("ledger rejected request: {0}")]
    Rejected(String),

    /// The ledger's own data is unreadable. Not retried.
    #[error("ledger store failure: {0}")]
    Internal(String),
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Backend(msg) => LedgerError::Unavailable(format!("store: {msg}")),
            other => LedgerError::Internal(other.to_string()),
        }
    }
}

/// Failure of a registry operation after retries.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },

    #[error("face hash already registered in tx {tx_id}")]
    AlreadyRegistered { tx_id: TxId },

    #[error("registry rejected request: {0}")]
    Rejected(String),

    #[error("registry operation cancelled")]
    Cancelled,

    #[error("ledger returned an invalid record: {0}")]
    InvalidRecord(String),

    #[error("ledger store failure: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Transient failures the caller may retry later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backend_store_errors_are_transient() {
        assert!(matches!(
            LedgerError::from(StoreError::Backend("map full".into())),
            LedgerError::Unavailable(_)
        ));
        assert!(matches!(
            LedgerError::from(StoreError::Corruption("bad page".into())),
            LedgerError::Internal(_)
        ));
        assert!(matches!(
            LedgerError::from(StoreError::Serialization("eof".into())),
            LedgerError::Internal(_)
        ));
    }
}
