//! LMDB storage backend for CreativeArmor.
//!
//! Implements every storage trait from `armor-store` using the `heed` LMDB
//! bindings. Each logical store maps to one or more named databases within a
//! single environment; [`LmdbStore`] holds them all.

pub mod alert;
pub mod allowlist;
pub mod environment;
pub mod error;
pub mod identity;
pub mod proof;
pub mod scan;

pub use environment::{LmdbEnvironment, LmdbStore};
pub use error::LmdbError;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Smallest key greater than every key starting with `prefix`.
pub(crate) fn increment_prefix(prefix: &mut Vec<u8>) {
    while let Some(last) = prefix.pop() {
        if last < u8::MAX {
            prefix.push(last + 1);
            return;
        }
    }
}
