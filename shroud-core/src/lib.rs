//! # Shroud Core
//!
//! Core types, errors, and traits for the Shroud stealth-payment identity layer.
//!
//! This crate provides the foundational building blocks used by all other Shroud crates:
//!
//! - **Types**: key material, meta-addresses, burn announcements and log entries
//! - **Errors**: the [`ShroudError`] taxonomy
//! - **Constants**: field modulus, domain separators, deployment parameters
//! - **Traits**: collaborator interfaces for registries, log sources and stealth derivation
//!
//! ## Example
//!
//! ```rust
//! use shroud_core::MetaAddress;
//!
//! let raw = "st:eth:0x02dd28cb779389065b3b5ae1cb349e8a523b51e09d40a930f3aaddb1aafb79e94c\
//!            03b3bf7f4340ccd4e0fc11dfcbf62453d4bafd98e51d0a70133e64d6a27472c736";
//! let meta: MetaAddress = raw.parse().unwrap();
//! assert_eq!(meta.to_string(), raw);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, ShroudError};
pub use traits::*;
pub use types::*;

pub use alloy_primitives::{Address, B256, U256};
