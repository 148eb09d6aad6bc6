//! The node wallet: an Ed25519 seed kept hex-encoded on disk.

use std::fs;
use std::path::Path;

use armor_crypto::{derive_address, generate_keypair, keypair_from_hex_seed};
use armor_types::KeyPair;
use tracing::info;

use crate::NodeError;

fn wallet_error(path: &Path, reason: impl ToString) -> NodeError {
    NodeError::Wallet {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Load the wallet at `path`, creating a fresh one on first run.
pub fn load_or_create_wallet(path: &Path) -> Result<KeyPair, NodeError> {
    if path.exists() {
        let raw = fs::read_to_string(path).map_err(|e| wallet_error(path, e))?;
        let keypair = keypair_from_hex_seed(raw.trim())
            .ok_or_else(|| wallet_error(path, "not a 64-character hex seed"))?;
        info!(address = %derive_address(&keypair.public), "wallet loaded");
        return Ok(keypair);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| wallet_error(path, e))?;
    }
    let keypair = generate_keypair();
    fs::write(path, format!("{}\n", hex::encode(keypair.private.0)))
        .map_err(|e| wallet_error(path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| wallet_error(path, e))?;
    }
    info!(address = %derive_address(&keypair.public), path = %path.display(), "wallet created");
    Ok(keypair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_once_then_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys").join("wallet.key");
        let first = load_or_create_wallet(&path).unwrap();
        let again = load_or_create_wallet(&path).unwrap();
        assert_eq!(first.public, again.public);
    }

    #[test]
    fn garbage_key_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.key");
        fs::write(&path, "not hex").unwrap();
        assert!(matches!(load_or_create_wallet(&path), Err(NodeError::Wallet { .. })));
    }
}
