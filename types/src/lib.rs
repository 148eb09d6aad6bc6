//! Fundamental types for CreativeArmor.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! digests, wallet addresses, keys, timestamps, proof records, verification results,
//! alerts and scan events.

pub mod address;
pub mod alert;
pub mod error;
pub mod hash;
pub mod identity;
pub mod keys;
pub mod proof;
pub mod scan;
pub mod time;
pub mod verification;

pub use address::WalletAddress;
pub use alert::{
    Alert, AlertId, AlertSource, AlertStatus, AlertTransition, Confidence, ModerationReason,
    Platform,
};
pub use error::ArmorError;
pub use hash::{ContentHash, FaceHash, TxId, WatermarkHash};
pub use identity::{IdentityRecord, TrustScore};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use proof::{ImageHashes, ProofData, ProofRecord, SignedProof};
pub use scan::{AnalyticsMetrics, ScanEvent, ScanOutcome, VerifiedImage};
pub use time::{Clock, SystemClock, Timestamp};
pub use verification::{Classification, Mismatch, VerificationResult};
