//! # Shroud ENS Integration
//!
//! Publishes and fetches meta-addresses through the ENS `metaKey` text record.
//!
//! - [`JsonRpcClient`]: minimal Ethereum JSON-RPC transport
//! - [`EnsClient`]: ENS registry/resolver access ([`TextRecordStore`])
//! - [`MetaKeyRegistry`]: publish / fetch / get-or-create / clear over any store

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod ens;
mod resolver;
mod rpc;

pub use ens::{namehash, reverse_node, EnsClient, EnsConfig};
pub use resolver::MetaKeyRegistry;
pub use rpc::JsonRpcClient;

pub use shroud_core::traits::TextRecordStore;
