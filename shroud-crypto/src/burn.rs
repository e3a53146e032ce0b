//! Burn-address commitments.
//!
//! ```text
//! pub_field     = int(observer_pk[1..33])      (drop the SEC1 parity byte)
//! stealth_field = int(stealth_address[1..20])  (drop the leading byte)
//! hash          = poseidon2([pub_field, stealth_field, PRIVATE_ADDRESS_TYPE])
//! burn_address  = checksum(be32(hash)[0..20])
//! ```
//!
//! Inputs at or above the field modulus are rejected with `FieldOverflow`;
//! nothing is reduced silently.

use alloy_primitives::{Address, U256};
use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};

use shroud_core::constants::{DomainSeparator, ETH_ADDRESS_SIZE, FIELD_MODULUS};
use shroud_core::error::{Result, ShroudError};
use shroud_core::types::CompressedPublicKey;

use crate::poseidon2::poseidon2_hash;

// ═══════════════════════════════════════════════════════════════════════════════
// FIELD ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Interprets big-endian bytes as a field element, rejecting values `>= FIELD_MODULUS`.
pub fn field_from_be_bytes(bytes: &[u8]) -> Result<Fr> {
    if bytes.len() > 32 || U256::from_be_slice(bytes) >= FIELD_MODULUS {
        return Err(ShroudError::FieldOverflow {
            input: format!("0x{}", hex::encode(bytes)),
        });
    }
    Ok(Fr::from_be_bytes_mod_order(bytes))
}

/// Canonical 32-byte big-endian encoding of a field element.
pub fn field_to_be_bytes(x: Fr) -> [u8; 32] {
    let bytes = x.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Field element of a domain separator.
pub fn domain_field(domain: DomainSeparator) -> Fr {
    Fr::from(domain.as_u128())
}

/// Field element of an observer public key: its x-coordinate.
pub fn public_key_field(key: &CompressedPublicKey) -> Result<Fr> {
    field_from_be_bytes(key.x_coordinate())
}

/// Field element of an address: its low 19 bytes.
pub fn address_field(address: &Address) -> Result<Fr> {
    field_from_be_bytes(&address.as_slice()[1..])
}

// ═══════════════════════════════════════════════════════════════════════════════
// BURN ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// The full 32-byte Poseidon2 commitment behind a burn address.
pub fn burn_commitment(observer: &CompressedPublicKey, stealth_address: &Address) -> Result<[u8; 32]> {
    let hash = poseidon2_hash(&[
        public_key_field(observer)?,
        address_field(stealth_address)?,
        domain_field(DomainSeparator::PrivateAddressType),
    ]);
    Ok(field_to_be_bytes(hash))
}

/// Burn address binding `observer` and `stealth_address`.
///
/// # Errors
/// `FieldOverflow` if the observer's x-coordinate is not below the field modulus.
pub fn compute_burn_address(observer: &CompressedPublicKey, stealth_address: &Address) -> Result<Address> {
    let commitment = burn_commitment(observer, stealth_address)?;
    Ok(Address::from_slice(&commitment[..ETH_ADDRESS_SIZE]))
}

/// Checks a logged burn address against `observer` and `stealth_address`.
///
/// Compares in constant time.
pub fn verify_burn_address(
    observer: &CompressedPublicKey,
    stealth_address: &Address,
    burn_address: &Address,
) -> Result<bool> {
    let computed = compute_burn_address(observer, stealth_address)?;
    Ok(subtle::ConstantTimeEq::ct_eq(computed.as_slice(), burn_address.as_slice()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shroud_core::constants::FIELD_LIMIT;

    const OBSERVER: &str = "022f8bde4d1a07209355b4a7250a5c5128e88b84bddc619ab7cba8d569b240efe4";
    const GENERATOR: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn observer() -> CompressedPublicKey {
        CompressedPublicKey::from_hex(OBSERVER).unwrap()
    }

    #[test]
    fn test_verify_burn_address() {
        let stealth = Address::repeat_byte(0x11);
        let burn = compute_burn_address(&observer(), &stealth).unwrap();
        assert!(verify_burn_address(&observer(), &stealth, &burn).unwrap());
        assert!(!verify_burn_address(&observer(), &Address::repeat_byte(0x12), &burn).unwrap());
    }

    #[test]
    fn test_burn_address_golden_vector() {
        let stealth = Address::repeat_byte(0x11);
        let commitment = burn_commitment(&observer(), &stealth).unwrap();
        assert_eq!(
            hex::encode(commitment),
            "28c43cabf08af87192be3aa3619ebe3d53d6c62edba48a1d180df1301ca6d24e"
        );

        let burn = compute_burn_address(&observer(), &stealth).unwrap();
        assert_eq!(
            burn.to_checksum(None),
            "0x28C43CabF08Af87192Be3aA3619eBe3D53D6c62E"
        );
    }

    #[test]
    fn test_burn_address_for_derived_stealth_address() {
        let stealth: Address = "0x21eF0E928E906912b0A95F06B166b45955AC78Bb".parse().unwrap();
        let burn = compute_burn_address(&observer(), &stealth).unwrap();
        assert_eq!(
            burn.to_checksum(None),
            "0x2a331497AC82f456f6Ebb8c59Ae858c3290DdeE3"
        );
    }

    #[test]
    fn test_observer_above_modulus_overflows() {
        let generator = CompressedPublicKey::from_hex(GENERATOR).unwrap();
        let result = compute_burn_address(&generator, &Address::repeat_byte(0x11));
        assert!(matches!(result, Err(ShroudError::FieldOverflow { .. })));
    }

    #[test]
    fn test_field_bounds() {
        let limit = FIELD_LIMIT.to_be_bytes::<32>();
        let modulus = FIELD_MODULUS.to_be_bytes::<32>();

        let x = field_from_be_bytes(&limit).unwrap();
        assert_eq!(field_to_be_bytes(x), limit);
        assert!(matches!(
            field_from_be_bytes(&modulus),
            Err(ShroudError::FieldOverflow { .. })
        ));
        assert!(matches!(
            field_from_be_bytes(&[0u8; 33]),
            Err(ShroudError::FieldOverflow { .. })
        ));
    }

    #[test]
    fn test_address_field_drops_leading_byte() {
        let mut bytes = [0u8; 20];
        bytes[0] = 0xff;
        bytes[19] = 0x07;
        let field = address_field(&Address::from(bytes)).unwrap();
        assert_eq!(field, Fr::from(7u64));
    }

    #[test]
    fn test_domain_field_is_private_address_type() {
        let bytes = field_to_be_bytes(domain_field(DomainSeparator::PrivateAddressType));
        assert_eq!(bytes, DomainSeparator::PrivateAddressType.to_be_bytes());
    }

    proptest! {
        #[test]
        fn prop_burn_address_is_deterministic(stealth in prop::array::uniform20(any::<u8>())) {
            let stealth = Address::from(stealth);
            let a = compute_burn_address(&observer(), &stealth).unwrap();
            let b = compute_burn_address(&observer(), &stealth).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
