//! Protocol constants for Shroud.
//!
//! Field arithmetic is over the BN254 scalar field, the field used by the
//! circuits and on-chain verifier that consume burn addresses.

use alloy_primitives::{address, Address, U256};

// ═══════════════════════════════════════════════════════════════════════════════
// FIELD
// ═══════════════════════════════════════════════════════════════════════════════

/// BN254 scalar field modulus.
///
/// `21888242871839275222246405745257275088548364400416034343698204186575808495617`
pub const FIELD_MODULUS: U256 = U256::from_limbs([
    0x43e1_f593_f000_0001,
    0x2833_e848_79b9_7091,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
]);

/// Largest canonical field element (`FIELD_MODULUS - 1`).
pub const FIELD_LIMIT: U256 = U256::from_limbs([
    0x43e1_f593_f000_0000,
    0x2833_e848_79b9_7091,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
]);

// ═══════════════════════════════════════════════════════════════════════════════
// DOMAIN SEPARATORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Closed set of field-level domain separators.
///
/// Each value is the big-endian integer of its ASCII tag. Burn addresses only
/// ever use [`DomainSeparator::PrivateAddressType`]; the two accounting
/// separators belong to balance commitments and must not be mixed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainSeparator {
    /// `"ZKWORMHOLE"`, tags burn-address commitments.
    PrivateAddressType,
    /// `"RECEIVED_TOTAL"`, tags received-balance accumulators.
    TotalReceived,
    /// `"SPENT_TOTAL"`, tags spent-balance accumulators.
    TotalSpent,
}

impl DomainSeparator {
    /// All separators, in declaration order.
    pub const ALL: [DomainSeparator; 3] = [
        DomainSeparator::PrivateAddressType,
        DomainSeparator::TotalReceived,
        DomainSeparator::TotalSpent,
    ];

    /// Raw integer value.
    pub const fn as_u128(self) -> u128 {
        match self {
            DomainSeparator::PrivateAddressType => 0x5a4b_574f_524d_484f_4c45,
            DomainSeparator::TotalReceived => 0x5245_4345_4956_4544_5f54_4f54_414c,
            DomainSeparator::TotalSpent => 0x5350_454e_545f_544f_5441_4c,
        }
    }

    /// ASCII tag the value encodes.
    pub const fn as_ascii(self) -> &'static str {
        match self {
            DomainSeparator::PrivateAddressType => "ZKWORMHOLE",
            DomainSeparator::TotalReceived => "RECEIVED_TOTAL",
            DomainSeparator::TotalSpent => "SPENT_TOTAL",
        }
    }

    /// Value as a 256-bit integer.
    pub fn value(self) -> U256 {
        U256::from(self.as_u128())
    }

    /// Value as a 32-byte big-endian word.
    pub fn to_be_bytes(self) -> [u8; 32] {
        self.value().to_be_bytes::<32>()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Length of an `r || s || v` wallet signature.
pub const WALLET_SIGNATURE_SIZE: usize = 65;

/// Domain string used when the caller does not pick one.
pub const DEFAULT_KEY_DOMAIN: &str = "Stealth Meta Address";

/// HKDF salt for the spending key.
pub const SPENDING_KEY_SALT: &[u8] = b"EIP-5564-spending-key";

/// HKDF salt for the viewing key.
pub const VIEWING_KEY_SALT: &[u8] = b"EIP-5564-viewing-key";

/// Upper bound on SHA-256 re-hashes while normalizing a derived scalar.
pub const MAX_DERIVATION_ATTEMPTS: usize = 16;

// ═══════════════════════════════════════════════════════════════════════════════
// ENCODING SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a secp256k1 secret scalar.
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of a SEC1 compressed secp256k1 point.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Size of an Ethereum address.
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Scheme prefix of a serialized meta-address.
pub const META_ADDRESS_SCHEME: &str = "st:eth:";

/// Prefix written by the encoder (scheme plus `0x`).
pub const META_ADDRESS_PREFIX: &str = "st:eth:0x";

/// Hex characters in a meta-address payload (two compressed keys).
pub const META_ADDRESS_HEX_LEN: usize = COMPRESSED_PUBLIC_KEY_SIZE * 2 * 2;

// ═══════════════════════════════════════════════════════════════════════════════
// ENS & REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Text record key holding a meta-address.
pub const META_KEY_TEXT_RECORD: &str = "metaKey";

/// ENS registry, identical on mainnet and Sepolia.
pub const ENS_REGISTRY_ADDRESS: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// ENS NameWrapper on Sepolia.
pub const SEPOLIA_NAME_WRAPPER: Address = address!("0635513f179D50A207757E05759CbD106d7dFcE8");

/// ENS NameWrapper on mainnet.
pub const MAINNET_NAME_WRAPPER: Address = address!("D4416b13d2b3a9aBae7AcD5D6C2BbDBE25686401");

/// Number of trailing blocks the scanner queries by default.
pub const DEFAULT_SCAN_LOOKBACK: u64 = 1000;

// ═══════════════════════════════════════════════════════════════════════════════
// DEPLOYMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Block the token was deployed at on Sepolia.
pub const SEPOLIA_DEPLOYMENT_BLOCK: u64 = 9_580_647;
