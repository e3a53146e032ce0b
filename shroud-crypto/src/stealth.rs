//! ERC-5564 stealth addresses on secp256k1.
//!
//! ## Derivation Flow
//!
//! ```text
//! sender:     shared = compress(e · V)          recipient:  shared = compress(v · E)
//!             h      = keccak256(shared)
//!             view_tag = h[0]
//!             P_stealth = S + h·G                            p_stealth = s + h (mod n)
//!             address   = keccak256(P_stealth.x || P_stealth.y)[12..32]
//! ```
//!
//! `e`/`E` is the ephemeral key pair, `v`/`V` the viewing pair and `s`/`S`
//! the spending pair.

use alloy_primitives::Address;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use shroud_core::constants::{COMPRESSED_PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};
use shroud_core::error::{Result, ShroudError};
use shroud_core::types::{CompressedPublicKey, MetaAddress, SecretScalar, StealthAddressResult};

use crate::hash::keccak256;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY CONVERSIONS
// ═══════════════════════════════════════════════════════════════════════════════

fn to_secret_key(secret: &SecretScalar) -> Result<SecretKey> {
    SecretKey::from_bytes(&FieldBytes::from(*secret.as_bytes()))
        .map_err(|_| ShroudError::InvalidKeySize {
            expected: SECRET_KEY_SIZE,
            actual: SECRET_KEY_SIZE,
        })
}

fn scalar_to_secret(scalar: &Scalar) -> SecretScalar {
    let mut bytes = [0u8; SECRET_KEY_SIZE];
    bytes.copy_from_slice(&scalar.to_bytes());
    SecretScalar::from_array(bytes)
}

/// Decodes a compressed key, checking that it lies on the curve.
pub fn decode_public_key(key: &CompressedPublicKey) -> Result<PublicKey> {
    PublicKey::from_sec1_bytes(key.as_bytes())
        .map_err(|_| ShroudError::InvalidPublicKey(format!("{} is not on secp256k1", key)))
}

/// Compresses a curve point.
pub fn compress_public_key(key: &PublicKey) -> Result<CompressedPublicKey> {
    CompressedPublicKey::from_bytes(key.to_encoded_point(true).as_bytes())
}

/// Public key for a secret scalar.
pub fn secret_to_public_key(secret: &SecretScalar) -> Result<CompressedPublicKey> {
    compress_public_key(&to_secret_key(secret)?.public_key())
}

/// Ethereum address of a public key.
pub fn public_key_to_address(key: &PublicKey) -> Address {
    let uncompressed = key.to_encoded_point(false);
    let hash = keccak256(&uncompressed.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Ethereum address controlled by a secret scalar.
pub fn secret_to_address(secret: &SecretScalar) -> Result<Address> {
    Ok(public_key_to_address(&to_secret_key(secret)?.public_key()))
}

/// Draws a fresh secret scalar.
pub fn generate_secret<R: RngCore + CryptoRng>(rng: &mut R) -> SecretScalar {
    let key = SecretKey::random(rng);
    scalar_to_secret(key.to_nonzero_scalar().as_ref())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED SECRET
// ═══════════════════════════════════════════════════════════════════════════════

/// ECDH point `secret · public` (compressed) and its Keccak256 hash.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    point: [u8; COMPRESSED_PUBLIC_KEY_SIZE],
    hash: [u8; 32],
}

impl SharedSecret {
    /// Computes `secret · public`.
    pub fn compute(secret: &SecretScalar, public: &CompressedPublicKey) -> Result<Self> {
        let secret = to_secret_key(secret)?;
        let public = decode_public_key(public)?;
        let shared = (public.to_projective() * *secret.to_nonzero_scalar()).to_affine();

        let mut point = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        point.copy_from_slice(shared.to_encoded_point(true).as_bytes());
        let hash = keccak256(&point);
        Ok(Self { point, hash })
    }

    /// Compressed shared point.
    pub fn point(&self) -> &[u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        &self.point
    }

    /// `keccak256(point)`.
    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// First byte of the hash.
    pub fn view_tag(&self) -> u8 {
        self.hash[0]
    }

    fn scalar(&self) -> Scalar {
        <Scalar as Reduce<k256::U256>>::reduce_bytes(&FieldBytes::from(self.hash))
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// `S + h·G`, the stealth public key.
pub fn derive_stealth_public_key(
    spending_public_key: &CompressedPublicKey,
    shared: &SharedSecret,
) -> Result<PublicKey> {
    let spending = decode_public_key(spending_public_key)?;
    let point = spending.to_projective() + ProjectivePoint::GENERATOR * shared.scalar();
    PublicKey::from_affine(point.to_affine())
        .map_err(|_| ShroudError::InvalidPublicKey("stealth key is the identity".into()))
}

/// `s + h (mod n)`, the private key controlling the stealth address.
pub fn derive_stealth_private_key(
    spending_key: &SecretScalar,
    shared: &SharedSecret,
) -> Result<SecretScalar> {
    let spending = to_secret_key(spending_key)?;
    let sum = *spending.to_nonzero_scalar() + shared.scalar();
    let sum: Option<NonZeroScalar> = NonZeroScalar::new(sum).into();
    let sum = sum.ok_or_else(|| ShroudError::InternalError("stealth private key is zero".into()))?;
    Ok(scalar_to_secret(sum.as_ref()))
}

/// Sender side: stealth address for `meta` using the given ephemeral secret.
///
/// Deterministic in `ephemeral_secret`; callers wanting a fresh address per
/// transfer draw it with [`generate_secret`].
pub fn generate_stealth_address(
    meta: &MetaAddress,
    ephemeral_secret: &SecretScalar,
) -> Result<StealthAddressResult> {
    let ephemeral_public_key = secret_to_public_key(ephemeral_secret)?;
    let shared = SharedSecret::compute(ephemeral_secret, meta.viewing_public_key())?;
    let stealth_key = derive_stealth_public_key(meta.spending_public_key(), &shared)?;

    Ok(StealthAddressResult {
        ephemeral_public_key,
        stealth_address: public_key_to_address(&stealth_key),
        view_tag: shared.view_tag(),
    })
}

/// Recipient side: the stealth address a given ephemeral key pays to.
pub fn recover_stealth_address(
    meta: &MetaAddress,
    viewing_key: &SecretScalar,
    ephemeral_public_key: &CompressedPublicKey,
) -> Result<(Address, SharedSecret)> {
    let shared = SharedSecret::compute(viewing_key, ephemeral_public_key)?;
    let stealth_key = derive_stealth_public_key(meta.spending_public_key(), &shared)?;
    Ok((public_key_to_address(&stealth_key), shared))
}
