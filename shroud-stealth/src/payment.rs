//! Burn payment creation (sender side).

use alloy_primitives::Address;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use shroud_core::error::Result;
use shroud_core::traits::StealthAddressDeriver;
use shroud_core::types::{BurnAnnouncement, CompressedPublicKey, MetaAddress, StealthAddressResult};
use shroud_crypto::burn::compute_burn_address;
use shroud_crypto::stealth::{generate_secret, generate_stealth_address};

/// ERC-5564 secp256k1 stealth derivation with an OS-random ephemeral key.
#[derive(Clone, Copy, Debug, Default)]
pub struct Erc5564Deriver;

impl StealthAddressDeriver for Erc5564Deriver {
    fn derive(&self, meta: &MetaAddress) -> Result<StealthAddressResult> {
        let ephemeral = generate_secret(&mut OsRng);
        generate_stealth_address(meta, &ephemeral)
    }
}

/// Everything a sender needs for one burn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnPayment {
    /// Stealth derivation output.
    pub stealth: StealthAddressResult,
    /// Address the value is burned to.
    pub burn_address: Address,
    /// Announcement to hand to the relay.
    pub announcement: BurnAnnouncement,
}

/// Derives a stealth address for `meta` and binds it to `observer` as a burn address.
pub fn create_burn_payment(
    deriver: &dyn StealthAddressDeriver,
    meta: &MetaAddress,
    observer: &CompressedPublicKey,
) -> Result<BurnPayment> {
    let stealth = deriver.derive(meta)?;
    let burn_address = compute_burn_address(observer, &stealth.stealth_address)?;

    Ok(BurnPayment {
        stealth,
        burn_address,
        announcement: BurnAnnouncement::new(stealth.ephemeral_public_key, burn_address),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::StealthWallet;
    use shroud_core::error::ShroudError;
    use shroud_core::types::SecretScalar;
    use shroud_crypto::stealth::secret_to_public_key;

    struct FixedDeriver(SecretScalar);

    impl StealthAddressDeriver for FixedDeriver {
        fn derive(&self, meta: &MetaAddress) -> Result<StealthAddressResult> {
            generate_stealth_address(meta, &self.0)
        }
    }

    fn scalar(byte: u8) -> SecretScalar {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        SecretScalar::from_array(bytes)
    }

    fn observer() -> CompressedPublicKey {
        secret_to_public_key(&scalar(5)).unwrap()
    }

    #[test]
    fn test_burn_payment_golden_vector() {
        let wallet = StealthWallet::from_signature(&[0xab; 65]).unwrap();
        let deriver = FixedDeriver(
            SecretScalar::from_hex("1d3b5e8f0a4c7e2b9f61a0c3d5e7f9012b4d6f8a0c2e4f6a8b0d2f4a6c8e0f2a")
                .unwrap(),
        );
        let payment = create_burn_payment(&deriver, wallet.meta_address(), &observer()).unwrap();

        assert_eq!(
            payment.stealth.stealth_address.to_checksum(None),
            "0x21eF0E928E906912b0A95F06B166b45955AC78Bb"
        );
        assert_eq!(
            payment.burn_address.to_checksum(None),
            "0x2a331497AC82f456f6Ebb8c59Ae858c3290DdeE3"
        );
        assert_eq!(payment.announcement.burn_address, payment.burn_address);
        assert_eq!(
            payment.announcement.ephemeral_public_key,
            payment.stealth.ephemeral_public_key
        );
    }

    #[test]
    fn test_os_random_deriver_is_fresh_per_call() {
        let wallet = StealthWallet::from_signature(&[0xab; 65]).unwrap();
        let a = Erc5564Deriver.derive(wallet.meta_address()).unwrap();
        let b = Erc5564Deriver.derive(wallet.meta_address()).unwrap();
        assert_ne!(a.ephemeral_public_key, b.ephemeral_public_key);
        assert_ne!(a.stealth_address, b.stealth_address);

        assert_eq!(wallet.stealth_address_for(&a.ephemeral_public_key).unwrap(), a.stealth_address);
    }

    #[test]
    fn test_overflowing_observer_is_fatal() {
        let wallet = StealthWallet::from_signature(&[0xab; 65]).unwrap();
        let generator = secret_to_public_key(&scalar(1)).unwrap();
        let result = create_burn_payment(&Erc5564Deriver, wallet.meta_address(), &generator);
        assert!(matches!(result, Err(ShroudError::FieldOverflow { .. })));
    }

    #[test]
    fn test_off_curve_meta_address_rejected() {
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 5;
        let bad = CompressedPublicKey::from_bytes(&bytes).unwrap();
        let meta = MetaAddress::from_keys(bad, bad);
        let result = create_burn_payment(&Erc5564Deriver, &meta, &observer());
        assert!(matches!(result, Err(ShroudError::InvalidPublicKey(_))));
    }

    #[test]
    fn test_payment_serializes_camel_case() {
        let wallet = StealthWallet::from_signature(&[0xab; 65]).unwrap();
        let payment = create_burn_payment(&Erc5564Deriver, wallet.meta_address(), &observer()).unwrap();
        let json = serde_json::to_value(&payment).unwrap();
        assert!(json.get("burnAddress").is_some());
        assert!(json["stealth"].get("ephemeralPublicKey").is_some());
    }
}
