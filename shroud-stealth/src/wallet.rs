//! Recipient wallet.
//!
//! A [`StealthWallet`] holds the spending/viewing keys derived from one
//! wallet signature and can recognise burns addressed to it.

use alloy_primitives::Address;

use shroud_core::error::Result;
use shroud_core::types::{
    BurnLogEntry, CompressedPublicKey, KeyMaterial, MetaAddress, PublicKeyPair, SecretScalar,
};
use shroud_crypto::keys::{derive_key_material, derive_stealth_keys, public_key_pair};
use shroud_crypto::stealth::{derive_stealth_private_key, recover_stealth_address, SharedSecret};

use crate::discovery::{check_burn, DiscoveredBurn};

/// Keys for receiving burn payments.
///
/// The viewing key finds incoming burns; the spending key controls the
/// stealth addresses they pay to.
pub struct StealthWallet {
    keys: KeyMaterial,
    meta_address: MetaAddress,
}

impl StealthWallet {
    /// Derives a wallet from a wallet signature under the default domain.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shroud_stealth::StealthWallet;
    ///
    /// let wallet = StealthWallet::from_signature(&[0xab; 65]).unwrap();
    /// assert!(wallet.meta_address().to_string().starts_with("st:eth:0x"));
    /// ```
    pub fn from_signature(signature: &[u8]) -> Result<Self> {
        Self::from_keys(derive_stealth_keys(signature)?)
    }

    /// Derives a wallet from a wallet signature under `domain`.
    pub fn from_signature_with_domain(signature: &[u8], domain: &str) -> Result<Self> {
        Self::from_keys(derive_key_material(signature, domain)?)
    }

    /// Wraps existing key material.
    pub fn from_keys(keys: KeyMaterial) -> Result<Self> {
        let meta_address = MetaAddress::new(public_key_pair(&keys)?);
        Ok(Self { keys, meta_address })
    }

    /// The meta-address to publish.
    pub fn meta_address(&self) -> &MetaAddress {
        &self.meta_address
    }

    /// Public spending/viewing keys.
    pub fn public_keys(&self) -> &PublicKeyPair {
        self.meta_address.keys()
    }

    /// Secret key material.
    ///
    /// # Security
    /// Never log or persist the returned keys.
    pub fn key_material(&self) -> &KeyMaterial {
        &self.keys
    }

    /// Viewing secret, enough to recognise burns but not to spend.
    pub fn viewing_key(&self) -> &SecretScalar {
        &self.keys.viewing_key
    }

    pub(crate) fn shared_secret(&self, ephemeral_public_key: &CompressedPublicKey) -> Result<(Address, SharedSecret)> {
        recover_stealth_address(&self.meta_address, &self.keys.viewing_key, ephemeral_public_key)
    }

    /// The stealth address a given ephemeral key pays to.
    pub fn stealth_address_for(&self, ephemeral_public_key: &CompressedPublicKey) -> Result<Address> {
        Ok(self.shared_secret(ephemeral_public_key)?.0)
    }

    /// Private key for the stealth address a given ephemeral key pays to.
    pub fn stealth_private_key(&self, ephemeral_public_key: &CompressedPublicKey) -> Result<SecretScalar> {
        let (_, shared) = self.shared_secret(ephemeral_public_key)?;
        derive_stealth_private_key(&self.keys.spending_key, &shared)
    }

    /// Checks whether an on-chain burn pays to this wallet.
    ///
    /// `observer` is the public key bound into the burn address by the sender.
    pub fn check_burn(
        &self,
        entry: &BurnLogEntry,
        observer: &CompressedPublicKey,
    ) -> Result<Option<DiscoveredBurn>> {
        check_burn(self, entry, observer)
    }
}

impl std::fmt::Debug for StealthWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StealthWallet")
            .field("meta_address", &self.meta_address)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_crypto::stealth::{generate_stealth_address, secret_to_address};

    #[test]
    fn test_wallet_meta_address_golden_vector() {
        let wallet = StealthWallet::from_signature(&[0xab; 65]).unwrap();
        assert_eq!(
            wallet.meta_address().to_string(),
            "st:eth:0x02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c\
             03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736"
        );
    }

    #[test]
    fn test_wallet_from_leading_one_signature() {
        let mut signature = [0u8; 65];
        signature[0] = 0x01;
        let wallet = StealthWallet::from_signature(&signature).unwrap();
        assert_eq!(
            wallet.meta_address().to_string(),
            "st:eth:0x02ec01fe5789f7f5816ece6b981af9949dae78057d91871a32bde8d00767a5365a\
             03a030a6b44cbc8544d8e75c2362b46036c06c3c222dba43b755e08458537ef64c"
        );
    }

    #[test]
    fn test_wallet_domain_matters() {
        let a = StealthWallet::from_signature(&[0xab; 65]).unwrap();
        let b = StealthWallet::from_signature_with_domain(&[0xab; 65], "Custom Domain").unwrap();
        assert_ne!(a.meta_address(), b.meta_address());
    }

    #[test]
    fn test_wallet_recovers_sender_address() {
        let wallet = StealthWallet::from_signature(&[0xab; 65]).unwrap();
        let ephemeral = SecretScalar::from_array([0x1d; 32]);
        let sent = generate_stealth_address(wallet.meta_address(), &ephemeral).unwrap();

        let address = wallet.stealth_address_for(&sent.ephemeral_public_key).unwrap();
        assert_eq!(address, sent.stealth_address);

        let sk = wallet.stealth_private_key(&sent.ephemeral_public_key).unwrap();
        assert_eq!(secret_to_address(&sk).unwrap(), sent.stealth_address);
    }

    #[test]
    fn test_wallet_debug_redacted() {
        let wallet = StealthWallet::from_signature(&[0xab; 65]).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("a04553c4"));
    }
}
