//! `StealthBurn` logs over Ethereum JSON-RPC.

use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U64};
use alloy_sol_types::{sol, SolEvent};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use shroud_core::error::{Result, ShroudError};
use shroud_core::traits::BurnLogSource;
use shroud_core::types::BurnLogEntry;
use shroud_ens::JsonRpcClient;

sol! {
    /// Emitted by the burn registry for every stealth burn. Neither field is indexed.
    event StealthBurn(bytes32 ephemeralPublicKey, address burnAddress);
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcLog {
    block_number: Option<U64>,
    log_index: Option<U64>,
    transaction_hash: Option<B256>,
    #[serde(default)]
    topics: Vec<B256>,
    #[serde(default)]
    data: Bytes,
    #[serde(default)]
    removed: bool,
}

impl RpcLog {
    /// Decodes a mined, non-removed log.
    fn into_entry(self) -> Result<Option<BurnLogEntry>> {
        let (Some(block_number), Some(log_index), Some(transaction_hash)) =
            (self.block_number, self.log_index, self.transaction_hash)
        else {
            return Ok(None);
        };
        if self.removed {
            return Ok(None);
        }

        let event = StealthBurn::decode_raw_log(self.topics.iter().copied(), &self.data, true)
            .map_err(|e| ShroudError::LogQueryFailed(format!("undecodable StealthBurn: {e}")))?;

        Ok(Some(BurnLogEntry {
            ephemeral_public_key: event.ephemeralPublicKey,
            burn_address: event.burnAddress,
            block_number: block_number.to::<u64>(),
            transaction_hash,
            log_index: log_index.to::<u64>(),
        }))
    }
}

/// Reads `StealthBurn` events of one registry contract.
pub struct RpcLogSource {
    rpc: JsonRpcClient,
    registry: Address,
}

impl RpcLogSource {
    /// Creates a source for the registry at `registry`.
    pub fn new(rpc_url: &str, registry: Address) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(rpc_url, Duration::from_secs(30))?,
            registry,
        })
    }

    /// Registry contract address.
    pub fn registry(&self) -> Address {
        self.registry
    }
}

#[async_trait]
impl BurnLogSource for RpcLogSource {
    async fn latest_block(&self) -> Result<u64> {
        let head: U64 = self
            .rpc
            .request("eth_blockNumber", serde_json::json!([]))
            .await
            .map_err(|e| ShroudError::LogQueryFailed(e.to_string()))?;
        Ok(head.to::<u64>())
    }

    #[instrument(skip(self), fields(registry = %self.registry))]
    async fn burn_logs(&self, from_block: u64, to_block: u64) -> Result<Vec<BurnLogEntry>> {
        let filter = serde_json::json!([{
            "address": self.registry,
            "fromBlock": U64::from(from_block),
            "toBlock": U64::from(to_block),
            "topics": [StealthBurn::SIGNATURE_HASH],
        }]);

        let logs: Vec<RpcLog> = self
            .rpc
            .request("eth_getLogs", filter)
            .await
            .map_err(|e| ShroudError::LogQueryFailed(e.to_string()))?;

        let total = logs.len();
        let mut entries = Vec::with_capacity(total);
        for log in logs {
            match log.into_entry() {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Skipping log"),
            }
        }

        debug!(total, decoded = entries.len(), "Fetched StealthBurn logs");
        Ok(entries)
    }
}
