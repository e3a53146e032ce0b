//! # Shroud Stealth Payments
//!
//! High-level API for creating and discovering burn payments.
//!
//! This crate provides:
//!
//! - **Wallet**: spending/viewing keys from a wallet signature and the matching meta-address
//! - **Deriver**: ERC-5564 stealth addresses with a fresh ephemeral key per call
//! - **Payment**: meta-address → stealth address → burn address → announcement
//! - **Discovery**: matching on-chain `StealthBurn` entries against a wallet
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shroud_stealth::{create_burn_payment, Erc5564Deriver, StealthWallet};
//!
//! // Recipient: derive keys and publish the meta-address
//! let wallet = StealthWallet::from_signature(&signature)?;
//! let meta = wallet.meta_address();
//!
//! // Sender: derive a burn payment for the recipient
//! let payment = create_burn_payment(&Erc5564Deriver, meta, &observer)?;
//! // Send funds to payment.burn_address, relay payment.announcement
//!
//! // Recipient: recognise the burn once it is on-chain
//! if let Some(found) = wallet.check_burn(&entry, &observer)? {
//!     println!("Found burn for {}", found.stealth_address);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod discovery;
pub mod payment;
pub mod wallet;

pub use discovery::{ephemeral_key_candidates, scan_entries, DiscoveredBurn, ScanStats};
pub use payment::{create_burn_payment, BurnPayment, Erc5564Deriver};
pub use wallet::StealthWallet;
