//! Cryptographic primitives for CreativeArmor.
//!
//! - **Blake2b-256** with domain separation for content, watermark and
//!   transaction digests
//! - **Ed25519** for wallet signatures over proof payloads
//! - Wallet address derivation with `carm_` prefix and base32 encoding

pub mod address;
pub mod hash;
pub mod keys;
pub mod proof;
pub mod sign;

pub use address::{decode_address, derive_address, public_key_of, validate_address};
pub use hash::{blake2b_256, blake2b_256_multi, domain_hash};
pub use keys::{generate_keypair, keypair_from_hex_seed, keypair_from_seed, public_from_private};
pub use proof::{sign_proof, transaction_id, verify_proof_signature};
pub use sign::{sign_message, verify_signature};
