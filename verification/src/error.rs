use armor_hashing::HashingError;
use armor_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The image is unusable: undecodable, or no face could be found.
    #[error("hashing failed: {0}")]
    Hashing(#[from] HashingError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl VerifyError {
    /// Whether the failure is the caller's input rather than the registry.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Hashing(_))
    }
}
