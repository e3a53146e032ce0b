//! In-memory `StealthBurn` event log.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use shroud_core::error::{Result, ShroudError};
use shroud_core::traits::BurnLogSource;
use shroud_core::types::BurnLogEntry;

/// Append-only burn log with a movable chain head.
#[derive(Debug, Default)]
pub struct MemoryBurnLog {
    entries: RwLock<Vec<BurnLogEntry>>,
    head: AtomicU64,
    failing: AtomicBool,
}

impl MemoryBurnLog {
    /// Creates an empty log at block 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, moving the head forward to its block if needed.
    pub fn push(&self, entry: BurnLogEntry) {
        self.head.fetch_max(entry.block_number, Ordering::SeqCst);
        self.entries.write().push(entry);
    }

    /// Sets the chain head.
    pub fn set_head(&self, block: u64) {
        self.head.store(block, Ordering::SeqCst);
    }

    /// Makes every query fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ShroudError::LogQueryFailed("log source unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BurnLogSource for MemoryBurnLog {
    async fn latest_block(&self) -> Result<u64> {
        self.check_available()?;
        Ok(self.head.load(Ordering::SeqCst))
    }

    #[instrument(skip(self))]
    async fn burn_logs(&self, from_block: u64, to_block: u64) -> Result<Vec<BurnLogEntry>> {
        self.check_available()?;
        let found: Vec<_> = self
            .entries
            .read()
            .iter()
            .filter(|e| (from_block..=to_block).contains(&e.block_number))
            .copied()
            .collect();
        debug!(count = found.len(), "Queried burn logs");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256};

    fn entry(block_number: u64, log_index: u64) -> BurnLogEntry {
        BurnLogEntry {
            ephemeral_public_key: B256::repeat_byte(0x02),
            burn_address: Address::repeat_byte(0x42),
            block_number,
            transaction_hash: B256::repeat_byte(block_number as u8),
            log_index,
        }
    }

    #[tokio::test]
    async fn test_range_is_inclusive() {
        let log = MemoryBurnLog::new();
        for block in [10, 20, 30] {
            log.push(entry(block, 0));
        }

        let found = log.burn_logs(10, 20).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(log.burn_logs(31, 40).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_head_tracks_entries() {
        let log = MemoryBurnLog::new();
        assert!(log.is_empty());
        assert_eq!(log.latest_block().await.unwrap(), 0);

        log.push(entry(50, 0));
        log.push(entry(40, 0));
        assert_eq!(log.latest_block().await.unwrap(), 50);

        log.set_head(70);
        assert_eq!(log.latest_block().await.unwrap(), 70);
        assert_eq!(log.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_source() {
        let log = MemoryBurnLog::new();
        log.set_failing(true);
        assert!(matches!(log.latest_block().await, Err(ShroudError::LogQueryFailed(_))));
        assert!(log.burn_logs(0, 1).await.is_err());

        log.set_failing(false);
        assert!(log.burn_logs(0, 1).await.is_ok());
    }
}
