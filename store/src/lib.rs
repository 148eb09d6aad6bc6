//! Abstract storage traits for CreativeArmor.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod alert;
pub mod allowlist;
pub mod error;
pub mod identity;
pub mod proof;
pub mod scan;

pub use alert::AlertStore;
pub use allowlist::AllowlistStore;
pub use error::StoreError;
pub use identity::IdentityStore;
pub use proof::{ProofInsert, ProofStore};
pub use scan::ScanStore;

/// Everything a node persists, behind one object.
pub trait ArmorStore:
    ProofStore + IdentityStore + AlertStore + ScanStore + AllowlistStore + Send + Sync
{
}

impl<T> ArmorStore for T where
    T: ProofStore + IdentityStore + AlertStore + ScanStore + AllowlistStore + Send + Sync
{
}
