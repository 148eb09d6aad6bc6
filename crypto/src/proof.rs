//! Signing and checking registration proofs.

use armor_types::{KeyPair, ProofData, SignedProof, TxId};

use crate::{domain_hash, public_key_of, sign_message, verify_signature};

const TX_DOMAIN: &str = "creativearmor/tx/v1";

/// Sign `data` with the wallet key.
///
/// The caller is responsible for `data.wallet` being the address of
/// `keypair.public`; otherwise [`verify_proof_signature`] will reject it.
pub fn sign_proof(data: ProofData, keypair: &KeyPair) -> SignedProof {
    let signature = sign_message(&data.signing_bytes(), &keypair.private);
    SignedProof { data, signature }
}

/// Check the signature against the key encoded in the proof's own wallet address.
pub fn verify_proof_signature(proof: &SignedProof) -> bool {
    match public_key_of(&proof.data.wallet) {
        Some(key) => verify_signature(&proof.data.signing_bytes(), &proof.signature, &key),
        None => false,
    }
}

/// Deterministic transaction id for a signed proof.
pub fn transaction_id(proof: &SignedProof) -> TxId {
    TxId::new(domain_hash(
        TX_DOMAIN,
        &[&proof.data.signing_bytes(), proof.signature.as_bytes()],
    ))
}
