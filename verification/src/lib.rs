//! Verification engine.
//!
//! A submitted image is hashed, its face hash looked up in the registry, and the
//! outcome classified as exactly one of:
//!
//! - **Verified**: face hash found, content hash matches.
//! - **Mismatched**: face hash found, content hash differs. Confirmed
//!   manipulation; carries the expected and actual content hashes.
//! - **NotFound**: face hash absent. No claim either way.
//!
//! Registration runs the same hashing, signs the proof with the wallet key
//! and commits it.

pub mod classify;
pub mod engine;
pub mod error;

pub use classify::classify;
pub use engine::VerificationEngine;
pub use error::VerifyError;
