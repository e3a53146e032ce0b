//! EIP-191 personal-message signing and signer recovery.
//!
//! The recovered compressed key is the observer key fed into burn-address
//! hashing.

use alloy_primitives::Address;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::FieldBytes;

use shroud_core::constants::WALLET_SIGNATURE_SIZE;
use shroud_core::error::{Result, ShroudError};
use shroud_core::types::{CompressedPublicKey, SecretScalar};

use crate::hash::eip191_hash;
use crate::stealth::{decode_public_key, public_key_to_address};

fn recovery_id(v: u8) -> Result<RecoveryId> {
    let parity = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        other => {
            return Err(ShroudError::InvalidSignature(format!(
                "unsupported recovery byte {}",
                other
            )))
        }
    };
    RecoveryId::from_byte(parity)
        .ok_or_else(|| ShroudError::InvalidSignature("invalid recovery id".into()))
}

/// Signs `message` the way a wallet's `personal_sign` does, returning `r || s || v` with `v` in {27, 28}.
pub fn sign_message(secret: &SecretScalar, message: &[u8]) -> Result<[u8; WALLET_SIGNATURE_SIZE]> {
    let signing_key = SigningKey::from_bytes(&FieldBytes::from(*secret.as_bytes()))
        .map_err(|e| ShroudError::InvalidSignature(format!("bad signing key: {}", e)))?;
    let (signature, recid) = signing_key
        .sign_prehash_recoverable(&eip191_hash(message))
        .map_err(|e| ShroudError::InvalidSignature(e.to_string()))?;

    let mut out = [0u8; WALLET_SIGNATURE_SIZE];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = 27 + recid.to_byte();
    Ok(out)
}

/// Recovers the compressed public key that signed `message`.
///
/// # Errors
/// `InvalidSignatureLength` unless the signature is 65 bytes,
/// `InvalidSignature` if it does not parse or recover.
pub fn recover_signer_public_key(message: &[u8], signature: &[u8]) -> Result<CompressedPublicKey> {
    if signature.len() != WALLET_SIGNATURE_SIZE {
        return Err(ShroudError::InvalidSignatureLength {
            expected: WALLET_SIGNATURE_SIZE,
            actual: signature.len(),
        });
    }

    let recid = recovery_id(signature[64])?;
    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| ShroudError::InvalidSignature(e.to_string()))?;
    let key = VerifyingKey::recover_from_prehash(&eip191_hash(message), &sig, recid)
        .map_err(|e| ShroudError::InvalidSignature(e.to_string()))?;

    CompressedPublicKey::from_bytes(key.to_encoded_point(true).as_bytes())
}

/// Recovers the address that signed `message`.
pub fn recover_signer_address(message: &[u8], signature: &[u8]) -> Result<Address> {
    let key = recover_signer_public_key(message, signature)?;
    Ok(public_key_to_address(&decode_public_key(&key)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stealth::{secret_to_address, secret_to_public_key};

    fn secret(byte: u8) -> SecretScalar {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        SecretScalar::from_array(bytes)
    }

    #[test]
    fn test_sign_and_recover_public_key() {
        let sk = secret(5);
        let signature = sign_message(&sk, b"Stealth Meta Address").unwrap();
        assert!(signature[64] == 27 || signature[64] == 28);

        let recovered = recover_signer_public_key(b"Stealth Meta Address", &signature).unwrap();
        assert_eq!(recovered, secret_to_public_key(&sk).unwrap());
        assert_eq!(
            recovered.to_hex(),
            "022f8bde4d1a07209355b4a7250a5c5128e88b84bddc619ab7cba8d569b240efe4"
        );
    }

    #[test]
    fn test_recover_address() {
        let sk = secret(1);
        let signature = sign_message(&sk, b"hello").unwrap();
        let address = recover_signer_address(b"hello", &signature).unwrap();
        assert_eq!(address, secret_to_address(&sk).unwrap());
    }

    #[test]
    fn test_accepts_raw_parity_byte() {
        let sk = secret(9);
        let mut signature = sign_message(&sk, b"msg").unwrap();
        signature[64] -= 27;
        let recovered = recover_signer_public_key(b"msg", &signature).unwrap();
        assert_eq!(recovered, secret_to_public_key(&sk).unwrap());
    }

    #[test]
    fn test_other_message_recovers_other_key() {
        let sk = secret(9);
        let signature = sign_message(&sk, b"msg").unwrap();
        match recover_signer_public_key(b"other", &signature) {
            Ok(key) => assert_ne!(key, secret_to_public_key(&sk).unwrap()),
            Err(e) => assert!(matches!(e, ShroudError::InvalidSignature(_))),
        }
    }

    #[test]
    fn test_rejects_bad_recovery_byte() {
        let mut signature = sign_message(&secret(3), b"msg").unwrap();
        signature[64] = 35;
        assert!(matches!(
            recover_signer_public_key(b"msg", &signature),
            Err(ShroudError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_rejects_short_signature() {
        assert!(matches!(
            recover_signer_public_key(b"msg", &[0u8; 64]),
            Err(ShroudError::InvalidSignatureLength { actual: 64, .. })
        ));
    }
}
