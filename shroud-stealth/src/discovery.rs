//! Burn discovery (recipient side).
//!
//! The registry contract stores the ephemeral key as `bytes32`, which keeps
//! the SEC1 prefix and the first 31 bytes of x and drops the last byte. The
//! recipient enumerates that byte, keeps the values that decode to curve
//! points, and checks each candidate against the logged burn address.

use alloy_primitives::{Address, B256};
use serde::Serialize;

use shroud_core::error::Result;
use shroud_core::types::{BurnLogEntry, CompressedPublicKey, SecretScalar};
use shroud_crypto::burn::verify_burn_address;
use shroud_crypto::stealth::{decode_public_key, derive_stealth_private_key};

use crate::wallet::StealthWallet;

/// A burn that pays to a wallet.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredBurn {
    /// Stealth address the burn is bound to.
    pub stealth_address: Address,
    /// Private key controlling the stealth address.
    #[serde(skip)]
    pub stealth_private_key: SecretScalar,
    /// Full ephemeral public key, recovered from the truncated log value.
    pub ephemeral_public_key: CompressedPublicKey,
    /// View tag of the shared secret.
    pub view_tag: u8,
    /// Burn address from the log.
    pub burn_address: Address,
    /// Block of the log.
    pub block_number: u64,
    /// Transaction of the log.
    pub transaction_hash: B256,
    /// Index of the log in its block.
    pub log_index: u64,
}

/// Scan counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Entries checked.
    pub total_scanned: u64,
    /// Ephemeral key candidates tried across all entries.
    pub candidates_tried: u64,
    /// Entries that paid to the wallet.
    pub discoveries: u64,
}

/// Curve points whose compressed encoding starts with the 32 logged bytes.
///
/// Empty when the first byte is not a compressed-point prefix.
pub fn ephemeral_key_candidates(onchain: &B256) -> Vec<CompressedPublicKey> {
    let mut bytes = [0u8; 33];
    bytes[..32].copy_from_slice(onchain.as_slice());

    (0..=u8::MAX)
        .filter_map(|last| {
            bytes[32] = last;
            let key = CompressedPublicKey::from_bytes(&bytes).ok()?;
            decode_public_key(&key).ok().map(|_| key)
        })
        .collect()
}

/// Checks one log entry against a wallet.
///
/// # Errors
/// `FieldOverflow` if `observer` cannot be bound into a burn address.
pub(crate) fn check_burn(
    wallet: &StealthWallet,
    entry: &BurnLogEntry,
    observer: &CompressedPublicKey,
) -> Result<Option<DiscoveredBurn>> {
    check_burn_counting(wallet, entry, observer).map(|(found, _)| found)
}

fn check_burn_counting(
    wallet: &StealthWallet,
    entry: &BurnLogEntry,
    observer: &CompressedPublicKey,
) -> Result<(Option<DiscoveredBurn>, u64)> {
    let candidates = ephemeral_key_candidates(&entry.ephemeral_public_key);
    let tried = candidates.len() as u64;

    for candidate in candidates {
        let (stealth_address, shared) = wallet.shared_secret(&candidate)?;
        if !verify_burn_address(observer, &stealth_address, &entry.burn_address)? {
            continue;
        }

        let stealth_private_key =
            derive_stealth_private_key(&wallet.key_material().spending_key, &shared)?;
        return Ok((
            Some(DiscoveredBurn {
                stealth_address,
                stealth_private_key,
                ephemeral_public_key: candidate,
                view_tag: shared.view_tag(),
                burn_address: entry.burn_address,
                block_number: entry.block_number,
                transaction_hash: entry.transaction_hash,
                log_index: entry.log_index,
            }),
            tried,
        ));
    }
    Ok((None, tried))
}

/// Checks every entry, preserving input order.
pub fn scan_entries(
    wallet: &StealthWallet,
    entries: &[BurnLogEntry],
    observer: &CompressedPublicKey,
) -> Result<(Vec<DiscoveredBurn>, ScanStats)> {
    let mut stats = ScanStats::default();
    let mut found = Vec::new();

    for entry in entries {
        let (discovery, tried) = check_burn_counting(wallet, entry, observer)?;
        stats.total_scanned += 1;
        stats.candidates_tried += tried;
        if let Some(discovery) = discovery {
            stats.discoveries += 1;
            found.push(discovery);
        }
    }
    Ok((found, stats))
}
