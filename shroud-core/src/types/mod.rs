//! Domain types for Shroud.
//!
//! - [`KeyMaterial`]: spending/viewing secrets
//! - [`MetaAddress`]: published handle for receiving private payments
//! - [`StealthAddressResult`]: one-time address for a specific payment
//! - [`BurnLogEntry`]: a `StealthBurn` event read from the chain

mod keys;
mod address;
mod announcement;

pub use keys::*;
pub use address::*;
pub use announcement::*;
