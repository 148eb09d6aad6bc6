use armor_store::StoreError;
use armor_types::{AlertId, ArmorError};
use thiserror::Error;

/// The text generator failed or produced unusable output. Never fatal: the
/// drafter falls back to the template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("text generator unreachable: {0}")]
    Transport(String),

    #[error("text generator timed out")]
    Timeout,

    #[error("text generator returned HTTP {0}")]
    Status(u16),

    #[error("text generator response malformed: {0}")]
    Malformed(String),

    #[error("generated notice rejected: {0}")]
    Implausible(String),
}

#[derive(Debug, Error)]
pub enum DefenseError {
    #[error("alert {0} not found")]
    UnknownAlert(AlertId),

    #[error("identity {0} not found")]
    UnknownIdentity(String),

    #[error(transparent)]
    Invalid(#[from] ArmorError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
