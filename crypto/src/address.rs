//! Wallet addresses derived from proof-signing public keys.
//!
//! Layout: `carm_` ‖ base32(public key, 52 chars) ‖ base32(checksum, 8 chars),
//! 65 characters in total. The checksum is the first 5 bytes of a
//! domain-separated Blake2b digest of the public key.

use armor_types::{PublicKey, WalletAddress};

use crate::domain_hash;

/// Lowercase alphabet without 0, 2, l or v.
const ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

const DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const CHECKSUM_DOMAIN: &str = "creativearmor/address/v1";
const KEY_CHARS: usize = 52;
const CHECKSUM_CHARS: usize = 8;

fn checksum(key: &[u8; 32]) -> [u8; 5] {
    let digest = domain_hash(CHECKSUM_DOMAIN, &[key]);
    let mut out = [0u8; 5];
    out.copy_from_slice(&digest[..5]);
    out
}

fn encode(bytes: &[u8], out: &mut String) {
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for &byte in bytes {
        acc = (acc << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((acc >> bits) & 0x1F) as usize] as char);
        }
        acc &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(ALPHABET[((acc << (5 - bits)) & 0x1F) as usize] as char);
    }
}

fn decode<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    let mut out = [0u8; N];
    let mut pos = 0;
    for c in s.bytes() {
        let val = *DECODE.get(c as usize)?;
        if val == 0xFF {
            return None;
        }
        acc = (acc << 5) | val as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            if pos == N {
                return None;
            }
            out[pos] = (acc >> bits) as u8;
            pos += 1;
        }
        acc &= (1 << bits) - 1;
    }
    // Trailing padding bits must be zero so each key has exactly one encoding.
    (pos == N && acc == 0).then_some(out)
}

/// Derive the wallet address for a public key.
pub fn derive_address(public_key: &PublicKey) -> WalletAddress {
    let mut s = String::with_capacity(WalletAddress::PREFIX.len() + KEY_CHARS + CHECKSUM_CHARS);
    s.push_str(WalletAddress::PREFIX);
    encode(public_key.as_bytes(), &mut s);
    encode(&checksum(public_key.as_bytes()), &mut s);
    WalletAddress::new_unchecked(s)
}

/// Recover the public key bytes from an address string.
///
/// Returns `None` on a bad prefix, bad length, foreign characters or a
/// checksum mismatch.
pub fn decode_address(address: &str) -> Option<[u8; 32]> {
    let body = address.strip_prefix(WalletAddress::PREFIX)?;
    if body.len() != KEY_CHARS + CHECKSUM_CHARS || !body.is_ascii() {
        return None;
    }
    let (key_part, sum_part) = body.split_at(KEY_CHARS);
    let key: [u8; 32] = decode(key_part)?;
    let sum: [u8; 5] = decode(sum_part)?;
    (sum == checksum(&key)).then_some(key)
}

pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_some()
}

/// The public key that owns `wallet`, if the address is well-formed.
pub fn public_key_of(wallet: &WalletAddress) -> Option<PublicKey> {
    decode_address(wallet.as_str()).map(PublicKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derived_address_shape() {
        let addr = derive_address(&generate_keypair().public);
        assert!(addr.as_str().starts_with("carm_"));
        assert_eq!(addr.as_str().len(), 65);
        assert!(validate_address(addr.as_str()));
    }

    #[test]
    fn public_key_recovered() {
        let kp = keypair_from_seed(&[9u8; 32]);
        let addr = derive_address(&kp.public);
        assert_eq!(public_key_of(&addr), Some(kp.public));
    }

    #[test]
    fn flipped_checksum_char_rejected() {
        let addr = derive_address(&keypair_from_seed(&[3u8; 32]).public);
        let mut bad = addr.as_str().to_string();
        let last = bad.pop().unwrap();
        bad.push(if last == '1' { '3' } else { '1' });
        assert!(!validate_address(&bad));
    }

    #[test]
    fn flipped_key_char_rejected() {
        let addr = derive_address(&keypair_from_seed(&[3u8; 32]).public);
        let mut chars: Vec<char> = addr.as_str().chars().collect();
        chars[10] = if chars[10] == 'a' { 'b' } else { 'a' };
        let bad: String = chars.into_iter().collect();
        assert!(!validate_address(&bad));
    }

    #[test]
    fn malformed_rejected() {
        assert!(!validate_address("carm_"));
        assert!(!validate_address("carm_short"));
        assert!(!validate_address(&format!("brst_{}", "1".repeat(60))));
        assert!(!validate_address(&format!("carm_{}", "0".repeat(60))));
    }

    #[test]
    fn base32_roundtrip() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF, 0x42];
        let mut s = String::new();
        encode(&data, &mut s);
        assert_eq!(s.len(), 8);
        assert_eq!(decode::<5>(&s), Some(data));
    }
}
