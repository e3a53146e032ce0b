//! Spending/viewing key derivation from a wallet signature.
//!
//! ## Derivation Flow
//!
//! ```text
//! signature (65 bytes, IKM)
//!       ├─ HKDF-SHA256(salt = "EIP-5564-spending-key", info = domain || "-spending") → candidate
//!       └─ HKDF-SHA256(salt = "EIP-5564-viewing-key",  info = domain || "-viewing")  → candidate
//!
//! candidate → while !(0 < candidate < n): candidate = SHA-256(candidate)
//! ```
//!
//! The re-hash loop is capped at [`MAX_DERIVATION_ATTEMPTS`]; past that the
//! derivation fails with `KeyDerivationExhausted`. Derivation is a pure
//! function of `(signature, domain)`.

use k256::{FieldBytes, SecretKey};
use zeroize::Zeroize;

use shroud_core::constants::{
    DEFAULT_KEY_DOMAIN, MAX_DERIVATION_ATTEMPTS, SPENDING_KEY_SALT, VIEWING_KEY_SALT,
    WALLET_SIGNATURE_SIZE,
};
use shroud_core::error::{Result, ShroudError};
use shroud_core::types::{KeyMaterial, PublicKeyPair, SecretScalar};

use crate::hash::{hkdf_sha256, sha256};
use crate::stealth::secret_to_public_key;

/// Returns true if `bytes` is a secp256k1 secret key (nonzero, below the curve order).
pub fn is_valid_scalar(bytes: &[u8; 32]) -> bool {
    SecretKey::from_bytes(&FieldBytes::from(*bytes)).is_ok()
}

/// Re-hashes `candidate` with SHA-256 until it is a valid scalar.
fn normalize_scalar(candidate: [u8; 32], max_attempts: usize) -> Result<SecretScalar> {
    let mut candidate = candidate;
    for _ in 0..max_attempts {
        if is_valid_scalar(&candidate) {
            return Ok(SecretScalar::from_array(candidate));
        }
        let next = sha256(&candidate);
        candidate.zeroize();
        candidate = next;
    }
    candidate.zeroize();
    Err(ShroudError::KeyDerivationExhausted {
        attempts: max_attempts,
    })
}

fn derive_role_key(signature: &[u8], salt: &[u8], info: String) -> Result<SecretScalar> {
    let candidate = hkdf_sha256(signature, salt, info.as_bytes())?;
    normalize_scalar(candidate, MAX_DERIVATION_ATTEMPTS)
}

/// Derives spending and viewing keys from a wallet signature under `domain`.
///
/// # Errors
/// - `InvalidSignatureLength` if `signature` is not 65 bytes
/// - `KeyDerivationExhausted` if a candidate never lands in range
pub fn derive_key_material(signature: &[u8], domain: &str) -> Result<KeyMaterial> {
    if signature.len() != WALLET_SIGNATURE_SIZE {
        return Err(ShroudError::InvalidSignatureLength {
            expected: WALLET_SIGNATURE_SIZE,
            actual: signature.len(),
        });
    }

    let spending_key = derive_role_key(signature, SPENDING_KEY_SALT, format!("{domain}-spending"))?;
    let viewing_key = derive_role_key(signature, VIEWING_KEY_SALT, format!("{domain}-viewing"))?;

    Ok(KeyMaterial::new(spending_key, viewing_key))
}

/// [`derive_key_material`] with the default domain, `"Stealth Meta Address"`.
pub fn derive_stealth_keys(signature: &[u8]) -> Result<KeyMaterial> {
    derive_key_material(signature, DEFAULT_KEY_DOMAIN)
}

/// Compressed public keys for a [`KeyMaterial`].
pub fn public_key_pair(keys: &KeyMaterial) -> Result<PublicKeyPair> {
    Ok(PublicKeyPair::new(
        secret_to_public_key(&keys.spending_key)?,
        secret_to_public_key(&keys.viewing_key)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use test_case::test_case;

    const CURVE_ORDER: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

    fn hex32(s: &str) -> [u8; 32] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_derivation_golden_vector() {
        let keys = derive_stealth_keys(&[0xab; 65]).unwrap();
        assert_eq!(
            hex::encode(keys.spending_key.as_bytes()),
            "a04553c41a295511dcbfc711ed88f2e6cbe8cff8e243c1525322b859420ea1c2"
        );
        assert_eq!(
            hex::encode(keys.viewing_key.as_bytes()),
            "fd9e59fba04fc8fdb08c99e3172d8e7dcb5d7aae3bf41ce63638fe763b9b13e1"
        );

        let public = public_key_pair(&keys).unwrap();
        assert_eq!(
            public.spending_public_key.to_hex(),
            "02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c"
        );
        assert_eq!(
            public.viewing_public_key.to_hex(),
            "03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736"
        );
    }

    #[test]
    fn test_derivation_leading_one_signature() {
        let mut signature = [0u8; 65];
        signature[0] = 0x01;
        let keys = derive_stealth_keys(&signature).unwrap();

        assert_ne!(keys.spending_key, keys.viewing_key);
        assert!(is_valid_scalar(keys.spending_key.as_bytes()));
        assert!(is_valid_scalar(keys.viewing_key.as_bytes()));
        assert_eq!(
            hex::encode(keys.spending_key.as_bytes()),
            "e08825462a4640a0b13a0b25e7e0daaca02b3a1716e306cf130d0aebc898c0b9"
        );
        assert_eq!(
            hex::encode(keys.viewing_key.as_bytes()),
            "b08a75fbb6c5c28be24373fe7574e95fa18e3a5edd06d742633f6a1885dfa11e"
        );
    }

    #[test]
    fn test_domain_changes_keys() {
        let keys = derive_key_material(&[0xab; 65], "Custom Domain").unwrap();
        assert_eq!(
            hex::encode(keys.spending_key.as_bytes()),
            "868603052568e93890d239d6ce39decaae32384c93eae8c1b8f1edb410702fcd"
        );
        let default = derive_stealth_keys(&[0xab; 65]).unwrap();
        assert_ne!(keys.spending_key, default.spending_key);
        assert_ne!(keys.viewing_key, default.viewing_key);
    }

    #[test]
    fn test_derivation_deterministic() {
        let a = derive_key_material(&[7u8; 65], "domain").unwrap();
        let b = derive_key_material(&[7u8; 65], "domain").unwrap();
        assert_eq!(a, b);
    }

    #[test_case(0 ; "empty")]
    #[test_case(64 ; "compact signature")]
    #[test_case(66 ; "one byte too many")]
    fn test_rejects_signature_length(len: usize) {
        let result = derive_stealth_keys(&vec![1u8; len]);
        assert!(matches!(
            result,
            Err(ShroudError::InvalidSignatureLength { expected: 65, actual }) if actual == len
        ));
    }

    #[test]
    fn test_is_valid_scalar_bounds() {
        assert!(!is_valid_scalar(&[0u8; 32]));
        assert!(!is_valid_scalar(&hex32(CURVE_ORDER)));
        assert!(!is_valid_scalar(&[0xff; 32]));

        let mut one = [0u8; 32];
        one[31] = 1;
        assert!(is_valid_scalar(&one));

        let mut order_minus_one = hex32(CURVE_ORDER);
        order_minus_one[31] -= 1;
        assert!(is_valid_scalar(&order_minus_one));
    }

    #[test]
    fn test_normalize_rehashes_invalid_candidate() {
        let key = normalize_scalar([0u8; 32], MAX_DERIVATION_ATTEMPTS).unwrap();
        assert_eq!(key.as_bytes(), &sha256(&[0u8; 32]));

        let key = normalize_scalar(hex32(CURVE_ORDER), MAX_DERIVATION_ATTEMPTS).unwrap();
        assert_eq!(key.as_bytes(), &sha256(&hex32(CURVE_ORDER)));
    }

    #[test]
    fn test_normalize_keeps_valid_candidate() {
        let candidate = [0x42u8; 32];
        let key = normalize_scalar(candidate, MAX_DERIVATION_ATTEMPTS).unwrap();
        assert_eq!(key.as_bytes(), &candidate);
    }

    #[test]
    fn test_normalize_exhaustion() {
        let result = normalize_scalar([0u8; 32], 1);
        assert!(matches!(
            result,
            Err(ShroudError::KeyDerivationExhausted { attempts: 1 })
        ));
    }

    #[test]
    fn test_randomized_signatures_yield_valid_scalars() {
        let mut rng = ChaCha20Rng::seed_from_u64(5564);
        let mut signature = [0u8; 65];
        for _ in 0..10_000 {
            rng.fill_bytes(&mut signature);
            let keys = derive_stealth_keys(&signature).unwrap();
            assert!(is_valid_scalar(keys.spending_key.as_bytes()));
            assert!(is_valid_scalar(keys.viewing_key.as_bytes()));
            assert_ne!(keys.spending_key, keys.viewing_key);
        }
    }
}
