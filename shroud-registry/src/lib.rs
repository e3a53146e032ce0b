//! # Shroud Registry
//!
//! In-memory implementations of the Shroud collaborator traits.
//!
//! - **MemoryTextRecords**: a name registry with owners, text records and
//!   reverse names ([`TextRecordStore`])
//! - **MemoryBurnLog**: an append-only `StealthBurn` event log ([`BurnLogSource`])
//!
//! Both back the unit tests of the registry client and scanner, and the CLI's
//! offline mode.
//!
//! ## Example
//!
//! ```rust
//! use shroud_registry::MemoryTextRecords;
//! use shroud_core::{Address, TextRecordStore};
//!
//! # tokio_test::block_on(async {
//! let owner = Address::repeat_byte(0x01);
//! let store = MemoryTextRecords::new().with_account(owner);
//! store.register("alice.eth", owner);
//!
//! store.set_text("alice.eth", "metaKey", "st:eth:0x..", None).await.unwrap();
//! assert_eq!(store.get_text("alice.eth", "metaKey").await.unwrap().as_deref(), Some("st:eth:0x.."));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod burn_log;
mod memory;

pub use burn_log::MemoryBurnLog;
pub use memory::{MemoryTextRecords, TextWrite};

// Re-export the traits from core
pub use shroud_core::traits::{BurnLogSource, TextRecordStore};
