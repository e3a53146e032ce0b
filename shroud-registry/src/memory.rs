//! In-memory text-record store.
//!
//! Models the parts of a name registry the meta-key client relies on: name
//! ownership, per-name text records, and primary (reverse) names.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use shroud_core::error::{Result, ShroudError};
use shroud_core::traits::TextRecordStore;

/// One accepted `set_text` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextWrite {
    /// Transaction hash handed back to the caller.
    pub tx_hash: B256,
    /// Name written.
    pub name: String,
    /// Record key.
    pub key: String,
    /// Value written.
    pub value: String,
    /// Resolver the write targeted, when overridden.
    pub resolver: Option<Address>,
}

/// In-memory name registry.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently.
#[derive(Debug, Default)]
pub struct MemoryTextRecords {
    /// (name, key) → value
    records: DashMap<(String, String), String>,
    /// name → owner
    owners: DashMap<String, Address>,
    /// address → primary name
    reverse: DashMap<Address, String>,
    /// Account signing writes
    account: Option<Address>,
    /// Every accepted write, oldest first
    writes: RwLock<Vec<TextWrite>>,
    next_tx: AtomicU64,
}

impl MemoryTextRecords {
    /// Creates an empty registry with no signing account.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account that signs writes.
    pub fn with_account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    /// Registers `name` to `owner`.
    pub fn register(&self, name: &str, owner: Address) {
        self.owners.insert(name.to_lowercase(), owner);
    }

    /// Sets the primary name of `address`.
    ///
    /// The name must be registered to `address` for the reverse record to verify.
    pub fn set_reverse(&self, address: Address, name: &str) {
        self.reverse.insert(address, name.to_lowercase());
    }

    /// All accepted writes, oldest first.
    pub fn writes(&self) -> Vec<TextWrite> {
        self.writes.read().clone()
    }

    fn next_tx_hash(&self) -> B256 {
        let n = self.next_tx.fetch_add(1, Ordering::SeqCst) + 1;
        B256::from(U256::from(n))
    }

    fn authorize(&self, name: &str, resolver_override: Option<Address>) -> Result<()> {
        let account = self.account.ok_or_else(|| ShroudError::RegistryWriteDenied {
            name: name.to_string(),
            reason: "no signing account configured".into(),
        })?;

        match self.owners.get(name) {
            Some(owner) if *owner == account => Ok(()),
            Some(owner) => Err(ShroudError::RegistryWriteDenied {
                name: name.to_string(),
                reason: format!("owned by {}, not {}", *owner, account),
            }),
            None if resolver_override.is_some() => Ok(()),
            None => Err(ShroudError::RegistryNotFound(name.to_string())),
        }
    }
}

#[async_trait]
impl TextRecordStore for MemoryTextRecords {
    #[instrument(skip(self))]
    async fn get_text(&self, name: &str, key: &str) -> Result<Option<String>> {
        let value = self
            .records
            .get(&(name.to_lowercase(), key.to_string()))
            .map(|v| v.value().clone())
            .filter(|v| !v.is_empty());
        debug!(found = value.is_some(), "Read text record");
        Ok(value)
    }

    #[instrument(skip(self, value))]
    async fn set_text(
        &self,
        name: &str,
        key: &str,
        value: &str,
        resolver_override: Option<Address>,
    ) -> Result<B256> {
        let name = name.to_lowercase();
        self.authorize(&name, resolver_override)?;

        let tx_hash = self.next_tx_hash();
        self.records
            .insert((name.clone(), key.to_string()), value.to_string());
        self.writes.write().push(TextWrite {
            tx_hash,
            name,
            key: key.to_string(),
            value: value.to_string(),
            resolver: resolver_override,
        });

        debug!(%tx_hash, "Wrote text record");
        Ok(tx_hash)
    }

    #[instrument(skip(self))]
    async fn reverse_name(&self, address: Address) -> Result<Option<String>> {
        let Some(name) = self.reverse.get(&address).map(|n| n.value().clone()) else {
            return Ok(None);
        };

        // Forward check: the primary name must resolve back to the address
        let verified = self.owners.get(&name).map(|o| *o == address).unwrap_or(false);
        debug!(%name, verified, "Reverse lookup");
        Ok(verified.then_some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "metaKey";

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn store() -> MemoryTextRecords {
        let store = MemoryTextRecords::new().with_account(alice());
        store.register("alice.eth", alice());
        store
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = store();
        let tx = store.set_text("alice.eth", KEY, "value", None).await.unwrap();
        assert_ne!(tx, B256::ZERO);
        assert_eq!(
            store.get_text("alice.eth", KEY).await.unwrap().as_deref(),
            Some("value")
        );
        assert_eq!(store.get_text("alice.eth", "other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_names_are_case_insensitive() {
        let store = store();
        store.set_text("Alice.ETH", KEY, "value", None).await.unwrap();
        assert!(store.get_text("alice.eth", KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_value_reads_as_missing() {
        let store = store();
        store.set_text("alice.eth", KEY, "", None).await.unwrap();
        assert_eq!(store.get_text("alice.eth", KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_denied_for_non_owner() {
        let store = MemoryTextRecords::new().with_account(Address::repeat_byte(0xbb));
        store.register("alice.eth", alice());

        let result = store.set_text("alice.eth", KEY, "value", None).await;
        assert!(matches!(result, Err(ShroudError::RegistryWriteDenied { .. })));
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_write_without_account_denied() {
        let store = MemoryTextRecords::new();
        store.register("alice.eth", alice());
        let result = store.set_text("alice.eth", KEY, "value", None).await;
        assert!(matches!(result, Err(ShroudError::RegistryWriteDenied { .. })));
    }

    #[tokio::test]
    async fn test_unregistered_name() {
        let store = store();
        let result = store.set_text("nobody.eth", KEY, "value", None).await;
        assert!(matches!(result, Err(ShroudError::RegistryNotFound(_))));

        let resolver = Address::repeat_byte(0x77);
        store
            .set_text("nobody.eth", KEY, "value", Some(resolver))
            .await
            .unwrap();
        assert_eq!(store.writes()[0].resolver, Some(resolver));
    }

    #[tokio::test]
    async fn test_each_write_gets_a_new_tx_hash() {
        let store = store();
        let a = store.set_text("alice.eth", KEY, "v", None).await.unwrap();
        let b = store.set_text("alice.eth", KEY, "v", None).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.writes().len(), 2);
    }

    #[tokio::test]
    async fn test_reverse_name_is_forward_verified() {
        let store = store();
        store.set_reverse(alice(), "alice.eth");
        assert_eq!(
            store.reverse_name(alice()).await.unwrap().as_deref(),
            Some("alice.eth")
        );

        let mallory = Address::repeat_byte(0x66);
        store.set_reverse(mallory, "alice.eth");
        assert_eq!(store.reverse_name(mallory).await.unwrap(), None);
        assert_eq!(store.reverse_name(Address::ZERO).await.unwrap(), None);
    }
}
