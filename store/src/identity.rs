use armor_types::IdentityRecord;

use crate::StoreError;

/// Registered human identities, keyed by id.
pub trait IdentityStore: Send + Sync {
    /// Insert or replace an identity.
    fn put_identity(&self, identity: &IdentityRecord) -> Result<(), StoreError>;

    fn get_identity(&self, id: &str) -> Result<Option<IdentityRecord>, StoreError>;

    fn list_identities(&self) -> Result<Vec<IdentityRecord>, StoreError>;
}
