//! Address types for Shroud.
//!
//! - [`MetaAddress`]: the public handle published to the name registry
//! - [`StealthAddressResult`]: what a sender derives from a meta-address

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::{CompressedPublicKey, PublicKeyPair};
use crate::constants::{
    COMPRESSED_PUBLIC_KEY_SIZE, META_ADDRESS_HEX_LEN, META_ADDRESS_PREFIX, META_ADDRESS_SCHEME,
};
use crate::error::{Result, ShroudError};

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A stealth meta-address (ERC-5564 `st:eth:` form).
///
/// # Format
/// ```text
/// st:eth:0x || hex(spending_pk[33]) || hex(viewing_pk[33])
/// ```
///
/// The encoder always writes the `0x`; the parser accepts the payload with or
/// without it. Anything else (other scheme, wrong length, non-hex,
/// non-compressed prefix byte) is rejected with `MalformedMetaAddress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MetaAddress {
    keys: PublicKeyPair,
}

impl MetaAddress {
    /// Wraps a public key pair.
    pub fn new(keys: PublicKeyPair) -> Self {
        Self { keys }
    }

    /// Builds from the two public keys.
    pub fn from_keys(spending: CompressedPublicKey, viewing: CompressedPublicKey) -> Self {
        Self::new(PublicKeyPair::new(spending, viewing))
    }

    /// Parses the transport string.
    pub fn parse(s: &str) -> Result<Self> {
        let payload = s.strip_prefix(META_ADDRESS_SCHEME).ok_or_else(|| {
            ShroudError::MalformedMetaAddress(format!("missing '{}' prefix", META_ADDRESS_SCHEME))
        })?;
        let payload = payload.strip_prefix("0x").unwrap_or(payload);

        if payload.len() != META_ADDRESS_HEX_LEN {
            return Err(ShroudError::MalformedMetaAddress(format!(
                "expected {} hex characters, got {}",
                META_ADDRESS_HEX_LEN,
                payload.len()
            )));
        }

        let bytes = hex::decode(payload)
            .map_err(|e| ShroudError::MalformedMetaAddress(format!("invalid hex: {}", e)))?;
        let (spending, viewing) = bytes.split_at(COMPRESSED_PUBLIC_KEY_SIZE);

        let spending = CompressedPublicKey::from_bytes(spending)
            .map_err(|e| ShroudError::MalformedMetaAddress(format!("spending key: {}", e)))?;
        let viewing = CompressedPublicKey::from_bytes(viewing)
            .map_err(|e| ShroudError::MalformedMetaAddress(format!("viewing key: {}", e)))?;

        Ok(Self::from_keys(spending, viewing))
    }

    /// Serializes to the transport string.
    ///
    /// Writes `st:eth:0x` plus 132 hex characters (141 in total), two longer
    /// than the bare `st:eth:` form, which [`MetaAddress::parse`] also accepts.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(META_ADDRESS_PREFIX.len() + META_ADDRESS_HEX_LEN);
        out.push_str(META_ADDRESS_PREFIX);
        out.push_str(&self.keys.spending_public_key.to_hex());
        out.push_str(&self.keys.viewing_public_key.to_hex());
        out
    }

    /// The wrapped key pair.
    pub fn keys(&self) -> &PublicKeyPair {
        &self.keys
    }

    /// Spending public key.
    pub fn spending_public_key(&self) -> &CompressedPublicKey {
        &self.keys.spending_public_key
    }

    /// Viewing public key.
    pub fn viewing_public_key(&self) -> &CompressedPublicKey {
        &self.keys.viewing_public_key
    }
}

impl From<PublicKeyPair> for MetaAddress {
    fn from(keys: PublicKeyPair) -> Self {
        Self::new(keys)
    }
}

impl std::fmt::Display for MetaAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl std::str::FromStr for MetaAddress {
    type Err = ShroudError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for MetaAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&MetaAddress::serialize(self))
    }
}

impl<'de> Deserialize<'de> for MetaAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Sender-side output of stealth derivation.
///
/// The ephemeral public key is published with the transfer so the recipient
/// can recompute the shared secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StealthAddressResult {
    /// Ephemeral public key, compressed.
    pub ephemeral_public_key: CompressedPublicKey,
    /// One-time stealth address.
    pub stealth_address: Address,
    /// First byte of the shared-secret hash.
    pub view_tag: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const SPENDING: &str = "02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c";
    const VIEWING: &str = "03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736";

    fn sample() -> MetaAddress {
        MetaAddress::from_keys(
            CompressedPublicKey::from_hex(SPENDING).unwrap(),
            CompressedPublicKey::from_hex(VIEWING).unwrap(),
        )
    }

    #[test]
    fn test_serialize_format() {
        let s = sample().serialize();
        assert_eq!(s, format!("st:eth:0x{}{}", SPENDING, VIEWING));
        assert_eq!(s.len(), META_ADDRESS_PREFIX.len() + META_ADDRESS_HEX_LEN);
        assert_eq!(s.len(), 141);
    }

    #[test]
    fn test_parse_roundtrip() {
        let meta = sample();
        assert_eq!(MetaAddress::parse(&meta.serialize()).unwrap(), meta);
        assert_eq!(meta.to_string().parse::<MetaAddress>().unwrap(), meta);
    }

    #[test]
    fn test_parse_without_0x() {
        let s = format!("st:eth:{}{}", SPENDING, VIEWING);
        assert_eq!(s.len(), 7 + 132);
        assert_eq!(MetaAddress::parse(&s).unwrap(), sample());
    }

    #[test]
    fn test_parse_uppercase_hex() {
        let s = format!("st:eth:0x{}{}", SPENDING.to_uppercase(), VIEWING.to_uppercase());
        assert_eq!(MetaAddress::parse(&s).unwrap(), sample());
    }

    #[test_case("" ; "empty")]
    #[test_case("st:eth:0x" ; "prefix only")]
    #[test_case("st:btc:0x02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736" ; "wrong chain")]
    #[test_case("0x02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736" ; "missing scheme")]
    #[test_case("st:eth:0x02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c7" ; "truncated")]
    #[test_case("st:eth:0x02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c73600" ; "too long")]
    #[test_case("st:eth:0xzzdd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736" ; "non hex")]
    #[test_case("st:eth:0x04dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736" ; "bad point prefix")]
    #[test_case(" st:eth:0x02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736" ; "leading space")]
    fn test_parse_rejects(input: &str) {
        assert!(matches!(
            MetaAddress::parse(input),
            Err(ShroudError::MalformedMetaAddress(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let meta = sample();
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, format!("\"{}\"", meta));
        let back: MetaAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }

    fn key_strategy() -> impl Strategy<Value = CompressedPublicKey> {
        (prop::bool::ANY, prop::array::uniform32(any::<u8>())).prop_map(|(odd, x)| {
            let mut bytes = [0u8; 33];
            bytes[0] = if odd { 0x03 } else { 0x02 };
            bytes[1..].copy_from_slice(&x);
            CompressedPublicKey::from_bytes(&bytes).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_meta_address_roundtrip(spending in key_strategy(), viewing in key_strategy()) {
            let meta = MetaAddress::from_keys(spending, viewing);
            prop_assert_eq!(MetaAddress::parse(&meta.serialize()).unwrap(), meta);
        }

        #[test]
        fn prop_parse_never_panics(s in "\\PC*") {
            let _ = MetaAddress::parse(&s);
        }
    }
}
