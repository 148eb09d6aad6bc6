//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (clock, storage, image sources) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! The ledger and text-generation nullables live next to their traits, in
//! `armor-registry` and `armor-defense`.

pub mod clock;
pub mod images;
pub mod store;

pub use clock::NullClock;
pub use images::{flat_image, sample_portrait};
pub use store::NullStore;
