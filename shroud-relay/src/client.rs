//! Relay HTTP client.

use std::collections::HashSet;
use std::time::Duration;

use alloy_primitives::{Address, B256};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use shroud_core::error::{Result, ShroudError};
use shroud_core::types::{BurnAnnouncement, RelayResult};

/// Environment variable holding the relay base URL.
pub const RELAY_URL_ENV: &str = "SHROUD_RELAY_URL";

/// Relay client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Base URL; `/relay` and `/health` are appended
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl RelayConfig {
    /// Creates a configuration for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: 30,
        }
    }

    /// Reads `SHROUD_RELAY_URL`, loading `.env` first.
    ///
    /// # Errors
    /// `RelayUnavailable` if the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        match std::env::var(RELAY_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Ok(Self::new(url.trim())),
            _ => Err(ShroudError::RelayUnavailable(format!(
                "{RELAY_URL_ENV} is not set"
            ))),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Body of `POST /relay`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    /// Compressed ephemeral public key, `0x`-prefixed hex
    pub ephemeral_public_key: String,
    /// Burn address, checksummed
    pub burn_address: String,
}

impl From<&BurnAnnouncement> for RelayRequest {
    fn from(announcement: &BurnAnnouncement) -> Self {
        Self {
            ephemeral_public_key: announcement.ephemeral_public_key.to_string(),
            burn_address: announcement.burn_address.to_checksum(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for one relay endpoint.
pub struct RelayClient {
    base_url: String,
    http: reqwest::Client,
    /// Announcements the relay has accepted
    accepted: Mutex<HashSet<(B256, Address)>>,
}

impl RelayClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    /// `RelayUnavailable` for an empty URL, `ConfigError` for one that does
    /// not parse.
    pub fn new(config: RelayConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ShroudError::RelayUnavailable("relay URL is empty".into()));
        }
        url::Url::parse(&base_url)
            .map_err(|e| ShroudError::ConfigError(format!("invalid relay URL {base_url}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ShroudError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url,
            http,
            accepted: Mutex::new(HashSet::new()),
        })
    }

    /// Creates a client from `SHROUD_RELAY_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(RelayConfig::from_env()?)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, e: reqwest::Error) -> ShroudError {
        if e.is_connect() || e.is_timeout() {
            ShroudError::RelayUnavailable(format!("{}: {e}", self.base_url))
        } else {
            ShroudError::HttpError(e.to_string())
        }
    }

    /// Submits a burn announcement.
    ///
    /// A 2xx response is returned as-is, including `success: false`.
    ///
    /// # Errors
    /// `RelaySubmissionRejected` for a non-2xx status or an unreadable body;
    /// `RelayUnavailable` if the relay cannot be reached.
    #[instrument(skip(self, announcement), fields(burn_address = %announcement.burn_address))]
    pub async fn submit(&self, announcement: &BurnAnnouncement) -> Result<RelayResult> {
        let url = format!("{}/relay", self.base_url);
        let request = RelayRequest::from(announcement);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let reason = serde_json::from_str::<RelayResult>(&body)
                .ok()
                .and_then(|r| r.error.or(Some(r.message)).filter(|m| !m.is_empty()))
                .unwrap_or(body);
            warn!(status = status.as_u16(), %reason, "Relay rejected submission");
            return Err(ShroudError::RelaySubmissionRejected {
                status: status.as_u16(),
                reason,
            });
        }

        let result: RelayResult =
            serde_json::from_str(&body).map_err(|e| ShroudError::RelaySubmissionRejected {
                status: status.as_u16(),
                reason: format!("malformed response: {e}"),
            })?;

        if result.success {
            self.accepted.lock().insert(announcement.dedup_key());
            info!(tx_hash = ?result.tx_hash, "Relay accepted burn");
        } else {
            warn!(error = ?result.error, "Relay reported failure");
        }
        Ok(result)
    }

    /// Submits unless this client already had the same announcement accepted.
    ///
    /// Returns `None` for a duplicate.
    pub async fn submit_once(&self, announcement: &BurnAnnouncement) -> Result<Option<RelayResult>> {
        if self.accepted.lock().contains(&announcement.dedup_key()) {
            debug!("Duplicate announcement, not resubmitting");
            return Ok(None);
        }
        self.submit(announcement).await.map(Some)
    }

    /// Checks `GET /health`.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "Relay unhealthy");
            return Ok(false);
        }

        let health: HealthResponse = response.json().await.map_err(|e| self.transport_error(e))?;
        Ok(health.status == "ok")
    }
}
