//! Meta-address registry on top of a text-record store.
//!
//! A user's meta-address lives in the `metaKey` text record of their name.
//! Lookups accept a name or a raw address; an address is first mapped to
//! its primary name.

use alloy_primitives::{Address, B256};
use rand::RngCore;
use tracing::{debug, info, instrument, warn};

use shroud_core::constants::META_KEY_TEXT_RECORD;
use shroud_core::error::Result;
use shroud_core::traits::TextRecordStore;
use shroud_core::types::{MetaAddress, RegistryWrite};

/// Bytes of randomness in a placeholder record.
const PLACEHOLDER_BYTES: usize = 16;

/// Publishes and fetches meta-addresses.
pub struct MetaKeyRegistry<S> {
    store: S,
    resolver_override: Option<Address>,
}

impl<S: TextRecordStore> MetaKeyRegistry<S> {
    /// Creates a registry over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            resolver_override: None,
        }
    }

    /// Sends writes to `resolver` instead of the name's registered resolver.
    pub fn with_resolver(mut self, resolver: Address) -> Self {
        self.resolver_override = Some(resolver);
        self
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes `meta` to the `metaKey` record of `name`.
    #[instrument(skip(self, meta))]
    pub async fn publish(&self, name: &str, meta: &MetaAddress) -> Result<B256> {
        let tx_hash = self.write(name, &meta.serialize()).await?;
        info!(name, %tx_hash, "Published meta-address");
        Ok(tx_hash)
    }

    /// Fetches and parses the meta-address of a name or address.
    ///
    /// Returns `Ok(None)` when nothing is published or the lookup fails.
    ///
    /// # Errors
    /// `MalformedMetaAddress` if a record exists but does not parse.
    #[instrument(skip(self))]
    pub async fn fetch(&self, name_or_address: &str) -> Result<Option<MetaAddress>> {
        match self.fetch_raw(name_or_address).await {
            Some(value) => MetaAddress::parse(&value).map(Some),
            None => Ok(None),
        }
    }

    /// Fetches the raw `metaKey` value of a name or address.
    ///
    /// Lookup failures are logged and reported as absent.
    pub async fn fetch_raw(&self, name_or_address: &str) -> Option<String> {
        let name = self.canonical_name(name_or_address).await?;

        match self.store.get_text(&name, META_KEY_TEXT_RECORD).await {
            Ok(value) => {
                debug!(%name, found = value.is_some(), "metaKey lookup");
                value
            }
            Err(e) => {
                warn!(%name, error = %e, "metaKey lookup failed");
                None
            }
        }
    }

    /// Returns the existing record of `name`, or publishes `meta`.
    #[instrument(skip(self, meta))]
    pub async fn get_or_create(&self, name: &str, meta: &MetaAddress) -> Result<RegistryWrite> {
        self.get_or_write(name, meta.serialize()).await
    }

    /// Returns the existing record of `name`, or publishes a random
    /// 16-byte placeholder.
    ///
    /// The placeholder is not a meta-address: [`MetaKeyRegistry::fetch`]
    /// reports it as malformed. Use it only to reserve the record.
    #[instrument(skip(self))]
    pub async fn get_or_create_placeholder(&self, name: &str) -> Result<RegistryWrite> {
        let mut token = [0u8; PLACEHOLDER_BYTES];
        rand::thread_rng().fill_bytes(&mut token);
        self.get_or_write(name, hex::encode(token)).await
    }

    /// Empties the `metaKey` record of `name`.
    #[instrument(skip(self))]
    pub async fn clear(&self, name: &str) -> Result<B256> {
        let tx_hash = self.write(name, "").await?;
        info!(name, %tx_hash, "Cleared meta-address");
        Ok(tx_hash)
    }

    async fn get_or_write(&self, name: &str, value: String) -> Result<RegistryWrite> {
        if let Some(existing) = self.fetch_raw(name).await {
            return Ok(RegistryWrite {
                name: name.to_string(),
                value: existing,
                tx_hash: None,
                is_new: false,
            });
        }

        let tx_hash = self.write(name, &value).await?;
        Ok(RegistryWrite {
            name: name.to_string(),
            value,
            tx_hash: Some(tx_hash),
            is_new: true,
        })
    }

    async fn write(&self, name: &str, value: &str) -> Result<B256> {
        self.store
            .set_text(name, META_KEY_TEXT_RECORD, value, self.resolver_override)
            .await
    }

    /// Maps an address to its primary name; names pass through.
    async fn canonical_name(&self, name_or_address: &str) -> Option<String> {
        let Ok(address) = name_or_address.trim().parse::<Address>() else {
            return Some(name_or_address.to_string());
        };

        match self.store.reverse_name(address).await {
            Ok(Some(name)) => Some(name),
            Ok(None) => {
                debug!(%address, "No primary name");
                None
            }
            Err(e) => {
                warn!(%address, error = %e, "Reverse lookup failed");
                None
            }
        }
    }
}
