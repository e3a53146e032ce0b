//! Collaborator traits for Shroud.
//!
//! Network-facing pieces (name registry, chain logs) and the stealth-address
//! primitive sit behind these traits so each component can be exercised with
//! an in-memory implementation.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BurnLogEntry, MetaAddress, StealthAddressResult};

// ═══════════════════════════════════════════════════════════════════════════════
// TEXT RECORD STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// A name registry with per-name text records (ENS-style).
#[async_trait]
pub trait TextRecordStore: Send + Sync {
    /// Reads a text record. `None` when the record is missing or empty.
    async fn get_text(&self, name: &str, key: &str) -> Result<Option<String>>;

    /// Writes a text record, returning the transaction hash.
    ///
    /// `resolver_override` targets a specific resolver instead of the one the
    /// registry reports for `name`.
    async fn set_text(
        &self,
        name: &str,
        key: &str,
        value: &str,
        resolver_override: Option<Address>,
    ) -> Result<B256>;

    /// Primary name for an address, if one is set and verifies forward.
    async fn reverse_name(&self, address: Address) -> Result<Option<String>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// BURN LOG SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Read access to `StealthBurn` events.
#[async_trait]
pub trait BurnLogSource: Send + Sync {
    /// Current chain head.
    async fn latest_block(&self) -> Result<u64>;

    /// Events in `[from_block, to_block]`, in any order.
    async fn burn_logs(&self, from_block: u64, to_block: u64) -> Result<Vec<BurnLogEntry>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH ADDRESS DERIVER
// ═══════════════════════════════════════════════════════════════════════════════

/// Sender-side stealth address generation.
///
/// Implementations draw a fresh ephemeral key on every call, so two calls
/// with the same meta-address give unrelated results.
pub trait StealthAddressDeriver: Send + Sync {
    /// Derives a one-time stealth address for `meta`.
    fn derive(&self, meta: &MetaAddress) -> Result<StealthAddressResult>;
}
