//! Key types for Shroud.
//!
//! - [`SecretScalar`]: a 32-byte secp256k1 secret (zeroized on drop)
//! - [`KeyMaterial`]: the spending and viewing secrets derived from one signature
//! - [`CompressedPublicKey`]: a 33-byte SEC1 compressed point
//! - [`PublicKeyPair`]: the public half of [`KeyMaterial`]
//!
//! These types check encoding only. Curve membership and scalar range are
//! enforced where keys are produced, in `shroud-crypto`.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{COMPRESSED_PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};
use crate::error::{Result, ShroudError};

/// Decodes hex with an optional `0x` prefix.
pub(crate) fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECRET SCALAR
// ═══════════════════════════════════════════════════════════════════════════════

/// A 32-byte secp256k1 secret key.
///
/// Zeroized on drop. Never expose this in logs or error messages.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretScalar {
    bytes: [u8; SECRET_KEY_SIZE],
}

impl SecretScalar {
    /// Creates a secret from raw bytes.
    ///
    /// # Errors
    /// Returns error if the length is not 32.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SECRET_KEY_SIZE] =
            bytes.try_into().map_err(|_| ShroudError::InvalidKeySize {
                expected: SECRET_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Creates a secret from a fixed-size array.
    pub fn from_array(bytes: [u8; SECRET_KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Parses a hex secret, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(s)?)
    }

    /// Returns the raw bytes.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.bytes
    }

    /// Returns `0x`-prefixed hex. Only for explicit export.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }
}

impl std::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretScalar([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY MATERIAL
// ═══════════════════════════════════════════════════════════════════════════════

/// Spending and viewing secrets derived from a wallet signature.
///
/// The viewing key can be handed to a scanner; the spending key controls funds
/// sent to stealth addresses.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct KeyMaterial {
    /// Secret used to spend from stealth addresses.
    pub spending_key: SecretScalar,
    /// Secret used to recognise incoming burns.
    pub viewing_key: SecretScalar,
}

impl KeyMaterial {
    /// Bundles two secrets.
    pub fn new(spending_key: SecretScalar, viewing_key: SecretScalar) -> Self {
        Self {
            spending_key,
            viewing_key,
        }
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("spending_key", &"[REDACTED]")
            .field("viewing_key", &"[REDACTED]")
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// SEC1 compressed secp256k1 public key (`0x02`/`0x03` prefix + x-coordinate).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPublicKey {
    bytes: [u8; COMPRESSED_PUBLIC_KEY_SIZE],
}

impl CompressedPublicKey {
    /// Creates a key from raw bytes.
    ///
    /// # Errors
    /// `InvalidKeySize` on a length other than 33, `InvalidPublicKey` if the
    /// first byte is not a compressed-point prefix.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; COMPRESSED_PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| ShroudError::InvalidKeySize {
                expected: COMPRESSED_PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(ShroudError::InvalidPublicKey(format!(
                "unexpected prefix 0x{:02x}",
                bytes[0]
            )));
        }
        Ok(Self { bytes })
    }

    /// Parses hex, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(s)?)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    /// Parity prefix byte.
    pub fn prefix(&self) -> u8 {
        self.bytes[0]
    }

    /// The x-coordinate, i.e. everything after the prefix.
    pub fn x_coordinate(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// Lowercase hex without `0x`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl std::fmt::Display for CompressedPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl std::fmt::Debug for CompressedPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompressedPublicKey({})", self)
    }
}

impl std::str::FromStr for CompressedPublicKey {
    type Err = ShroudError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for CompressedPublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CompressedPublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Public halves of [`KeyMaterial`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyPair {
    /// Spending public key.
    pub spending_public_key: CompressedPublicKey,
    /// Viewing public key.
    pub viewing_public_key: CompressedPublicKey,
}

impl PublicKeyPair {
    /// Bundles two public keys.
    pub fn new(spending_public_key: CompressedPublicKey, viewing_public_key: CompressedPublicKey) -> Self {
        Self {
            spending_public_key,
            viewing_public_key,
        }
    }
}
