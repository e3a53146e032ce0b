//! ENS client for reading and writing text records.
//!
//! Reads go through the ENS registry: `resolver(node)` then the resolver's
//! `text(node, key)`. Writes are sent with `eth_sendTransaction` from the
//! configured account after an ownership check.

use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use tracing::{debug, info, instrument};

use shroud_core::constants::{ENS_REGISTRY_ADDRESS, MAINNET_NAME_WRAPPER, SEPOLIA_NAME_WRAPPER};
use shroud_core::error::{Result, ShroudError};
use shroud_core::traits::TextRecordStore;

use crate::rpc::JsonRpcClient;

sol! {
    interface IEnsRegistry {
        function owner(bytes32 node) external view returns (address);
        function resolver(bytes32 node) external view returns (address);
    }

    interface INameWrapper {
        function ownerOf(uint256 id) external view returns (address);
    }

    interface IPublicResolver {
        function text(bytes32 node, string key) external view returns (string);
        function setText(bytes32 node, string key, string value) external;
        function addr(bytes32 node) external view returns (address);
        function name(bytes32 node) external view returns (string);
    }
}

/// ENS client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnsConfig {
    /// Ethereum RPC URL
    pub rpc_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// ENS registry contract
    pub registry: Address,
    /// NameWrapper contract; names owned by it are checked through `ownerOf`
    pub name_wrapper: Address,
    /// Account that signs writes (must be unlocked on the node)
    pub account: Option<Address>,
}

/// Default Ethereum RPC URL when none is provided.
const DEFAULT_ETH_RPC_URL: &str = "https://ethereum.publicnode.com";

impl Default for EnsConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_ETH_RPC_URL.into(),
            timeout_seconds: 30,
            registry: ENS_REGISTRY_ADDRESS,
            name_wrapper: MAINNET_NAME_WRAPPER,
            account: None,
        }
    }
}

impl EnsConfig {
    /// Creates a mainnet configuration with the given RPC URL.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }

    /// Creates a Sepolia configuration with the given RPC URL.
    pub fn sepolia(rpc_url: impl Into<String>) -> Self {
        Self::new(rpc_url).with_name_wrapper(SEPOLIA_NAME_WRAPPER)
    }

    /// Sets the signing account.
    pub fn with_account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    /// Overrides the NameWrapper address.
    pub fn with_name_wrapper(mut self, name_wrapper: Address) -> Self {
        self.name_wrapper = name_wrapper;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Computes the ENS namehash of `name`.
pub fn namehash(name: &str) -> B256 {
    let mut node = [0u8; 32];

    for label in name.rsplit('.') {
        if label.is_empty() {
            continue;
        }

        let label_hash = Keccak256::digest(label.as_bytes());

        let mut combined = [0u8; 64];
        combined[..32].copy_from_slice(&node);
        combined[32..].copy_from_slice(&label_hash);

        node = Keccak256::digest(combined).into();
    }

    B256::from(node)
}

/// Namehash of `<address>.addr.reverse`.
pub fn reverse_node(address: Address) -> B256 {
    namehash(&format!("{}.addr.reverse", hex::encode(address.as_slice())))
}

/// Normalizes an ENS name (trim, lowercase, validate format).
fn normalize_name(name: &str) -> Result<String> {
    let normalized = name.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(ShroudError::ValidationError("ENS name cannot be empty".into()));
    }

    if !normalized.contains('.') || normalized.split('.').any(str::is_empty) {
        return Err(ShroudError::ValidationError(format!(
            "ENS name must be a full domain: {name}"
        )));
    }

    Ok(normalized)
}

/// ENS client over JSON-RPC.
pub struct EnsClient {
    config: EnsConfig,
    rpc: JsonRpcClient,
}

impl EnsClient {
    /// Creates a mainnet client for `rpc_url`.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self> {
        Self::with_config(EnsConfig::new(rpc_url))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: EnsConfig) -> Result<Self> {
        let rpc = JsonRpcClient::new(&config.rpc_url, Duration::from_secs(config.timeout_seconds))?;
        Ok(Self { config, rpc })
    }

    /// Active configuration.
    pub fn config(&self) -> &EnsConfig {
        &self.config
    }

    async fn eth_call<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return> {
        let data = self.rpc.call(to, call.abi_encode()).await?;
        C::abi_decode_returns(&data, true)
            .map_err(|e| ShroudError::RpcError(format!("{}: {e}", C::SIGNATURE)))
    }

    /// Resolver registered for `node`, or `None` if unset.
    pub async fn resolver(&self, node: B256) -> Result<Option<Address>> {
        let resolver = self
            .eth_call(self.config.registry, IEnsRegistry::resolverCall { node })
            .await?
            ._0;
        Ok((resolver != Address::ZERO).then_some(resolver))
    }

    /// Effective owner of `node`, looking through the NameWrapper.
    #[instrument(skip(self))]
    pub async fn owner(&self, node: B256) -> Result<Address> {
        let owner = self
            .eth_call(self.config.registry, IEnsRegistry::ownerCall { node })
            .await?
            ._0;

        if owner != self.config.name_wrapper {
            return Ok(owner);
        }

        let id = U256::from_be_bytes(node.0);
        let wrapped = self
            .eth_call(self.config.name_wrapper, INameWrapper::ownerOfCall { id })
            .await?
            ._0;
        debug!(%wrapped, "Name is wrapped");
        Ok(wrapped)
    }

    /// Address record of `name`, or `None` if it has no resolver.
    pub async fn addr(&self, name: &str) -> Result<Option<Address>> {
        let node = namehash(&normalize_name(name)?);
        let Some(resolver) = self.resolver(node).await? else {
            return Ok(None);
        };
        let addr = self
            .eth_call(resolver, IPublicResolver::addrCall { node })
            .await?
            ._0;
        Ok((addr != Address::ZERO).then_some(addr))
    }
}

#[async_trait]
impl TextRecordStore for EnsClient {
    #[instrument(skip(self))]
    async fn get_text(&self, name: &str, key: &str) -> Result<Option<String>> {
        let node = namehash(&normalize_name(name)?);
        let Some(resolver) = self.resolver(node).await? else {
            debug!(name, "No resolver set");
            return Ok(None);
        };

        let value = self
            .eth_call(
                resolver,
                IPublicResolver::textCall {
                    node,
                    key: key.to_string(),
                },
            )
            .await?
            ._0;

        Ok((!value.is_empty()).then_some(value))
    }

    #[instrument(skip(self, value))]
    async fn set_text(
        &self,
        name: &str,
        key: &str,
        value: &str,
        resolver_override: Option<Address>,
    ) -> Result<B256> {
        let name = normalize_name(name)?;
        let node = namehash(&name);

        let account = self.config.account.ok_or_else(|| ShroudError::RegistryWriteDenied {
            name: name.clone(),
            reason: "no signing account configured".into(),
        })?;

        let resolver = match resolver_override {
            Some(resolver) => resolver,
            None => self
                .resolver(node)
                .await?
                .ok_or_else(|| ShroudError::RegistryNotFound(name.clone()))?,
        };

        let owner = self.owner(node).await?;
        if owner != account {
            return Err(ShroudError::RegistryWriteDenied {
                name,
                reason: format!("owned by {owner}, not {account}"),
            });
        }

        let data = IPublicResolver::setTextCall {
            node,
            key: key.to_string(),
            value: value.to_string(),
        }
        .abi_encode();

        let tx_hash: B256 = self
            .rpc
            .request(
                "eth_sendTransaction",
                serde_json::json!([{
                    "from": account,
                    "to": resolver,
                    "data": alloy_primitives::Bytes::from(data),
                }]),
            )
            .await?;

        info!(%name, key, %tx_hash, "Text record write sent");
        Ok(tx_hash)
    }

    #[instrument(skip(self))]
    async fn reverse_name(&self, address: Address) -> Result<Option<String>> {
        let node = reverse_node(address);
        let Some(resolver) = self.resolver(node).await? else {
            return Ok(None);
        };

        let name = self
            .eth_call(resolver, IPublicResolver::nameCall { node })
            .await?
            ._0;
        if name.is_empty() {
            return Ok(None);
        }

        // Forward check: a reverse record alone proves nothing
        let forward = self.addr(&name).await?;
        if forward != Some(address) {
            debug!(%name, ?forward, "Reverse record does not verify");
            return Ok(None);
        }
        Ok(Some(name))
    }
}
