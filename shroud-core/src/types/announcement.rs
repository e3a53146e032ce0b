//! Burn announcements, log entries, and write receipts.
//!
//! A sender announces `(ephemeral key, burn address)`. The registry contract
//! stores the ephemeral key as a `bytes32`, so only the first 32 bytes of the
//! compressed key survive on-chain.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use super::CompressedPublicKey;

// ═══════════════════════════════════════════════════════════════════════════════
// ANNOUNCEMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// A burn as the sender announces it to the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnAnnouncement {
    /// Full compressed ephemeral public key.
    pub ephemeral_public_key: CompressedPublicKey,
    /// Address that receives the burned value.
    pub burn_address: Address,
}

impl BurnAnnouncement {
    /// Creates an announcement.
    pub fn new(ephemeral_public_key: CompressedPublicKey, burn_address: Address) -> Self {
        Self {
            ephemeral_public_key,
            burn_address,
        }
    }

    /// The `bytes32` the registry contract records for the ephemeral key.
    pub fn onchain_ephemeral_key(&self) -> B256 {
        B256::from_slice(&self.ephemeral_public_key.as_bytes()[..32])
    }

    /// Key callers use to de-duplicate relay retries.
    pub fn dedup_key(&self) -> (B256, Address) {
        (self.onchain_ephemeral_key(), self.burn_address)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOG ENTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// A `StealthBurn` event read back from the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnLogEntry {
    /// Ephemeral key as stored on-chain (first 32 bytes of the compressed key).
    pub ephemeral_public_key: B256,
    /// Burn address.
    pub burn_address: Address,
    /// Block the event was emitted in.
    pub block_number: u64,
    /// Emitting transaction.
    pub transaction_hash: B256,
    /// Position of the log within the block.
    pub log_index: u64,
}

impl BurnLogEntry {
    /// `(block_number, log_index)`, the chain's total order on logs.
    pub fn position(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }

    /// Sorts most recent first.
    pub fn sort_most_recent_first(entries: &mut [BurnLogEntry]) {
        entries.sort_by(|a, b| b.position().cmp(&a.position()));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RELAY & REGISTRY RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Response body of a relay submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResult {
    /// Whether the relay accepted the burn.
    pub success: bool,
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
    /// Settlement transaction, once sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Relay-side failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a registry write or get-or-create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryWrite {
    /// Name the record belongs to.
    pub name: String,
    /// Value now held in the record.
    pub value: String,
    /// Transaction that wrote it; `None` when nothing was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,
    /// Whether this call created the record.
    pub is_new: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(block_number: u64, log_index: u64) -> BurnLogEntry {
        BurnLogEntry {
            ephemeral_public_key: B256::repeat_byte(block_number as u8),
            burn_address: Address::repeat_byte(log_index as u8),
            block_number,
            transaction_hash: B256::ZERO,
            log_index,
        }
    }

    #[test]
    fn test_sort_most_recent_first() {
        let mut entries = vec![entry(99, 5), entry(100, 1), entry(100, 2)];
        BurnLogEntry::sort_most_recent_first(&mut entries);
        let positions: Vec<_> = entries.iter().map(|e| e.position()).collect();
        assert_eq!(positions, vec![(100, 2), (100, 1), (99, 5)]);
    }

    #[test]
    fn test_onchain_key_truncates_last_byte() {
        let mut bytes = [0x22u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 0xff;
        let ann = BurnAnnouncement::new(
            CompressedPublicKey::from_bytes(&bytes).unwrap(),
            Address::ZERO,
        );
        let onchain = ann.onchain_ephemeral_key();
        assert_eq!(onchain[0], 0x02);
        assert_eq!(onchain.as_slice(), &bytes[..32]);
    }

    #[test]
    fn test_relay_result_optional_fields() {
        let parsed: RelayResult =
            serde_json::from_str(r#"{"success":true,"message":"queued"}"#).unwrap();
        assert!(parsed.success);
        assert!(parsed.tx_hash.is_none());

        let parsed: RelayResult = serde_json::from_str(
            r#"{"success":false,"message":"failed","error":"nonce too low"}"#,
        )
        .unwrap();
        assert_eq!(parsed.error.as_deref(), Some("nonce too low"));
    }
}
