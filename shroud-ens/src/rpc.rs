//! Ethereum JSON-RPC transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use shroud_core::error::{Result, ShroudError};

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client over HTTP.
#[derive(Debug)]
pub struct JsonRpcClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Creates a client for `url`.
    ///
    /// # Errors
    /// `ConfigError` if the URL does not parse, `HttpError` if the HTTP
    /// client cannot be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(url)
            .map_err(|e| ShroudError::ConfigError(format!("invalid RPC URL {url}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShroudError::HttpError(e.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one request and decodes its `result`.
    #[instrument(skip(self, params), fields(url = %self.url))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ShroudError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShroudError::HttpError(format!("{method}: HTTP {status}")));
        }

        let parsed: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| ShroudError::RpcError(format!("{method}: {e}")))?;

        if let Some(error) = parsed.error {
            warn!(method, code = error.code, message = %error.message, "JSON-RPC error");
            return Err(ShroudError::RpcError(format!(
                "{method}: {} ({})",
                error.message, error.code
            )));
        }

        debug!(method, id, "JSON-RPC ok");
        parsed
            .result
            .ok_or_else(|| ShroudError::RpcError(format!("{method}: missing result")))
    }

    /// `eth_call` against the latest block.
    pub async fn call(&self, to: Address, data: Vec<u8>) -> Result<Bytes> {
        self.request(
            "eth_call",
            serde_json::json!([{ "to": to, "data": Bytes::from(data) }, "latest"]),
        )
        .await
    }
}
