//! # Shroud Scanner
//!
//! Windowed scanning of `StealthBurn` events.
//!
//! ## Features
//!
//! - **Windowed Scans**: the most recent `lookback` blocks by default
//! - **Backward Pagination**: walk older windows down to a floor block
//! - **Total Ordering**: results sorted by `(block, log_index)`, most recent first
//! - **Best Effort**: query failures are logged and yield empty results
//! - **Recipient Matching**: optional check of every entry against a wallet
//!
//! ## Example
//!
//! ```rust,ignore
//! use shroud_scanner::{BurnScanner, RpcLogSource, ScannerConfig};
//!
//! let source = RpcLogSource::new("https://rpc.sepolia.org", registry)?;
//! let scanner = BurnScanner::new(source, ScannerConfig::sepolia());
//!
//! for entry in scanner.scan().await {
//!     println!("burn to {} in block {}", entry.burn_address, entry.block_number);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod rpc;

use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use shroud_core::constants::{DEFAULT_SCAN_LOOKBACK, SEPOLIA_DEPLOYMENT_BLOCK};
use shroud_core::error::Result;
use shroud_core::traits::BurnLogSource;
use shroud_core::types::{BurnLogEntry, CompressedPublicKey};
use shroud_stealth::{scan_entries, DiscoveredBurn, ScanStats, StealthWallet};

pub use rpc::{RpcLogSource, StealthBurn};

/// Scanner configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Blocks behind the head covered by one window
    pub lookback: u64,
    /// Oldest block worth querying (contract deployment)
    pub min_block: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_SCAN_LOOKBACK,
            min_block: 0,
        }
    }
}

impl ScannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for the Sepolia deployment.
    pub fn sepolia() -> Self {
        Self::default().min_block(SEPOLIA_DEPLOYMENT_BLOCK)
    }

    /// Sets the window size.
    pub fn lookback(mut self, blocks: u64) -> Self {
        self.lookback = blocks;
        self
    }

    /// Sets the floor block.
    pub fn min_block(mut self, block: u64) -> Self {
        self.min_block = block;
        self
    }
}

/// An inclusive block range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanWindow {
    /// First block (inclusive)
    pub from_block: u64,
    /// Last block (inclusive)
    pub to_block: u64,
}

impl ScanWindow {
    /// Window ending at `head`, covering `lookback` blocks before it.
    ///
    /// `None` when `head` is below the floor block: there is nothing to query.
    pub fn ending_at(head: u64, config: &ScannerConfig) -> Option<Self> {
        if head < config.min_block {
            return None;
        }
        Some(Self {
            from_block: head.saturating_sub(config.lookback).max(config.min_block),
            to_block: head,
        })
    }

    /// The window just before this one, or `None` once the floor is reached.
    pub fn previous(&self, config: &ScannerConfig) -> Option<Self> {
        if self.from_block <= config.min_block {
            return None;
        }
        Self::ending_at(self.from_block - 1, config)
    }
}

/// Progress of a multi-window scan.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgress {
    /// Window just scanned
    pub window: ScanWindow,
    /// Windows scanned so far
    pub windows: u64,
    /// Entries found so far
    pub entries: u64,
    /// Windows whose query failed
    pub failed_windows: u64,
}

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(&ScanProgress) + Send + Sync>;

/// Result of matching a window against a wallet.
#[derive(Debug)]
pub struct ScanSummary {
    /// Window scanned
    pub window: ScanWindow,
    /// Burns paying to the wallet, most recent first
    pub discoveries: Vec<DiscoveredBurn>,
    /// Matching counters
    pub stats: ScanStats,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

/// Scans a burn log source.
pub struct BurnScanner<L> {
    source: L,
    config: ScannerConfig,
    last_window: RwLock<Option<ScanWindow>>,
}

impl<L: BurnLogSource> BurnScanner<L> {
    /// Creates a scanner over `source`.
    pub fn new(source: L, config: ScannerConfig) -> Self {
        Self {
            source,
            config,
            last_window: RwLock::new(None),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Underlying log source.
    pub fn source(&self) -> &L {
        &self.source
    }

    /// Window covered by the most recent scan.
    pub fn last_window(&self) -> Option<ScanWindow> {
        *self.last_window.read()
    }

    /// Window ending at the current head, or `None` if the head is unknown
    /// or still below the floor block.
    pub async fn current_window(&self) -> Option<ScanWindow> {
        match self.source.latest_block().await {
            Ok(head) => {
                let window = ScanWindow::ending_at(head, &self.config);
                if window.is_none() {
                    debug!(head, min_block = self.config.min_block, "Head is below the floor block");
                }
                window
            }
            Err(e) => {
                warn!(error = %e, "Failed to read chain head");
                None
            }
        }
    }

    /// Scans the most recent window.
    ///
    /// An empty result does not prove absence: failures are logged and
    /// reported as empty.
    #[instrument(skip(self))]
    pub async fn scan(&self) -> Vec<BurnLogEntry> {
        match self.current_window().await {
            Some(window) => self.scan_window(window).await,
            None => Vec::new(),
        }
    }

    /// Scans one window, most recent first.
    #[instrument(skip(self))]
    pub async fn scan_window(&self, window: ScanWindow) -> Vec<BurnLogEntry> {
        *self.last_window.write() = Some(window);
        self.try_scan_window(window).await.unwrap_or_else(|e| {
            warn!(error = %e, ?window, "Burn log query failed");
            Vec::new()
        })
    }

    async fn try_scan_window(&self, window: ScanWindow) -> Result<Vec<BurnLogEntry>> {
        let mut entries = self
            .source
            .burn_logs(window.from_block, window.to_block)
            .await?;
        BurnLogEntry::sort_most_recent_first(&mut entries);
        debug!(count = entries.len(), ?window, "Scanned window");
        Ok(entries)
    }

    /// Walks backward from the head, one window at a time, until the floor
    /// or `max_windows`, whichever comes first.
    ///
    /// Failed windows are skipped and counted in the progress report.
    #[instrument(skip(self, progress))]
    pub async fn scan_history(
        &self,
        max_windows: u64,
        progress: Option<ProgressCallback>,
    ) -> Vec<BurnLogEntry> {
        let mut all = Vec::new();
        let mut report = ScanProgress::default();
        let mut next = self.current_window().await;

        while let Some(window) = next {
            if report.windows >= max_windows {
                break;
            }

            match self.try_scan_window(window).await {
                Ok(entries) => all.extend(entries),
                Err(e) => {
                    warn!(error = %e, ?window, "Skipping window");
                    report.failed_windows += 1;
                }
            }

            report.window = window;
            report.windows += 1;
            report.entries = all.len() as u64;
            if let Some(callback) = &progress {
                callback(&report);
            }

            *self.last_window.write() = Some(window);
            next = window.previous(&self.config);
        }

        // Sources may return entries outside the requested range
        BurnLogEntry::sort_most_recent_first(&mut all);
        info!(
            windows = report.windows,
            entries = all.len(),
            failed = report.failed_windows,
            "History scan complete"
        );
        all
    }

    /// Scans the most recent window and keeps the burns paying to `wallet`.
    ///
    /// # Errors
    /// `FieldOverflow` if `observer` cannot be bound into a burn address.
    #[instrument(skip(self, wallet, observer))]
    pub async fn scan_for_wallet(
        &self,
        wallet: &StealthWallet,
        observer: &CompressedPublicKey,
    ) -> Result<ScanSummary> {
        let start = Instant::now();
        let (window, entries) = match self.current_window().await {
            Some(window) => (window, self.scan_window(window).await),
            None => (ScanWindow::default(), Vec::new()),
        };

        let (discoveries, stats) = scan_entries(wallet, &entries, observer)?;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            discoveries = discoveries.len(),
            scanned = stats.total_scanned,
            duration_ms,
            "Scan complete"
        );

        Ok(ScanSummary {
            window,
            discoveries,
            stats,
            duration_ms,
        })
    }
}
