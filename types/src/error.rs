//! Validation errors for the shared types.

use thiserror::Error;

use crate::AlertStatus;

#[derive(Debug, Error)]
pub enum ArmorError {
    #[error("invalid {kind}: {reason}")]
    InvalidHash { kind: &'static str, reason: String },

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("trust score {0} is outside 0..=100")]
    InvalidTrustScore(u8),

    #[error("confidence {0} is outside 0..=100")]
    InvalidConfidence(f64),

    #[error("alert cannot move from {from} to {to}")]
    InvalidTransition { from: AlertStatus, to: AlertStatus },

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("invalid alert id {0:?}")]
    InvalidAlertId(String),

    #[error("invalid identity record: {0}")]
    InvalidIdentity(String),
}
