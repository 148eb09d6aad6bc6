use armor_types::{ContentHash, VerifiedImage};

use crate::StoreError;

/// Content hashes the user has approved. Detections of these raise no alert.
pub trait AllowlistStore: Send + Sync {
    /// Adding an already-listed hash keeps the original entry.
    fn add_verified(&self, image: &VerifiedImage) -> Result<(), StoreError>;

    fn is_verified(&self, content: &ContentHash) -> Result<bool, StoreError>;

    fn verified_images(&self) -> Result<Vec<VerifiedImage>, StoreError>;
}
