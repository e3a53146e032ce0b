//! Hashing and key-derivation primitives.
//!
//! ```text
//! keccak256        addresses, shared-secret hashes, ENS namehash
//! sha256           re-hash of out-of-range key candidates
//! hkdf_sha256      spending/viewing key expansion
//! eip191_hash      "\x19Ethereum Signed Message:\n" || len || message
//! ```

use hkdf::Hkdf;
use sha2::Sha256;
use sha3::{Digest, Keccak256};

use shroud_core::error::{Result, ShroudError};

// ═══════════════════════════════════════════════════════════════════════════════
// DIGESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes Keccak256 hash (used for Ethereum addresses).
///
/// Note: Keccak256 is NOT SHA3-256. They use different padding.
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().into()
}

/// Computes SHA-256.
pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// HKDF
// ═══════════════════════════════════════════════════════════════════════════════

/// HKDF-SHA256 extract-and-expand to 32 bytes.
pub fn hkdf_sha256(ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<[u8; 32]> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = [0u8; 32];
    hk.expand(info, &mut okm)
        .map_err(|e| ShroudError::InternalError(format!("HKDF expand failed: {}", e)))?;
    Ok(okm)
}

// ═══════════════════════════════════════════════════════════════════════════════
// EIP-191
// ═══════════════════════════════════════════════════════════════════════════════

/// Hash of a personal message as wallets sign it.
pub fn eip191_hash(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    Digest::update(&mut hasher, b"\x19Ethereum Signed Message:\n");
    Digest::update(&mut hasher, message.len().to_string().as_bytes());
    Digest::update(&mut hasher, message);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256() {
        let hash = keccak256(b"hello");
        let expected =
            hex::decode("1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8").unwrap();
        assert_eq!(hash.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_sha256() {
        let hash = sha256(b"abc");
        assert_eq!(
            hex::encode(hash),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hkdf_rfc5869_case_1() {
        let ikm = [0x0bu8; 22];
        let salt: Vec<u8> = (0x00..=0x0c).collect();
        let info: Vec<u8> = (0xf0..=0xf9).collect();
        let okm = hkdf_sha256(&ikm, &salt, &info).unwrap();
        assert_eq!(
            hex::encode(okm),
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf"
        );
    }

    #[test]
    fn test_hkdf_salt_separates_outputs() {
        let a = hkdf_sha256(b"ikm", b"salt-a", b"info").unwrap();
        let b = hkdf_sha256(b"ikm", b"salt-b", b"info").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_eip191_hash() {
        assert_eq!(
            hex::encode(eip191_hash(b"hello")),
            "50b2c43fd39106bafbba0da34fc430e1f91e3c96ea2acee2bc34119f92b37750"
        );
        assert_eq!(
            hex::encode(eip191_hash(b"Stealth Meta Address")),
            "aa63bd93545a9e84b91913161f70bafa71945d840224d5f0f5003f0f539b3d1e"
        );
    }
}
