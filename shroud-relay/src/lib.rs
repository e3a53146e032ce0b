//! Relay client for Shroud burn announcements.
//!
//! The relay settles a burn on-chain on the sender's behalf. This crate only
//! speaks its HTTP contract: `POST /relay` and `GET /health`.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{RelayClient, RelayConfig, RelayRequest, RELAY_URL_ENV};
