//! # Shroud Cryptography
//!
//! Cryptographic primitives for the Shroud stealth-payment layer.
//!
//! This crate provides:
//!
//! - **Hash**: Keccak256, SHA-256, HKDF-SHA256 and EIP-191 message hashing
//! - **Keys**: deterministic spending/viewing key derivation from a wallet signature
//! - **Stealth**: ERC-5564 secp256k1 stealth addresses (sender and recipient halves)
//! - **Signing**: EIP-191 signing and signer public-key recovery
//! - **Poseidon2**: the BN254 width-4 permutation and sponge
//! - **Burn**: burn-address commitments over the BN254 scalar field
//!
//! ## Security Properties
//!
//! - Secret scalars are zeroized on drop and never logged
//! - Derived scalars are range-checked against the curve order
//! - Field inputs are range-checked against the field modulus, never reduced
//!
//! ## Example
//!
//! ```rust
//! use shroud_crypto::{derive_stealth_keys, public_key_pair, compute_burn_address};
//!
//! let signature = [0xabu8; 65];
//! let keys = derive_stealth_keys(&signature).unwrap();
//! let public = public_key_pair(&keys).unwrap();
//! assert_ne!(public.spending_public_key, public.viewing_public_key);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod burn;
pub mod hash;
pub mod keys;
pub mod poseidon2;
mod poseidon2_constants;
pub mod signing;
pub mod stealth;

// Re-export main functions at crate root
pub use burn::{address_field, compute_burn_address, public_key_field, verify_burn_address};
pub use hash::{eip191_hash, hkdf_sha256, keccak256, sha256};
pub use keys::{derive_key_material, derive_stealth_keys, is_valid_scalar, public_key_pair};
pub use poseidon2::{poseidon2_hash, poseidon2_permutation};
pub use signing::{recover_signer_address, recover_signer_public_key, sign_message};
pub use stealth::{
    derive_stealth_private_key, generate_stealth_address, public_key_to_address,
    secret_to_address, secret_to_public_key, SharedSecret,
};
