//! Custodial wallet ledger adapter.
//!
//! REST client for a programmable-wallet ledger: balances, wallet
//! addresses, transfers and transaction status, each call retried on
//! transient failures. Transfers carry a freshly encrypted entity secret.

pub mod client;
pub mod dto;
pub mod entity_secret;
pub mod settings;
