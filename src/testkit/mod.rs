//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`pool`] - [`ScriptedPool`](pool::ScriptedPool), a mock
//!   [`PoolStateReader`](crate::port::outbound::pool::PoolStateReader) with queued results,
//!   call counting and simulated latency.
//! - [`ledger`] - [`InMemoryLedger`](ledger::InMemoryLedger), a mock
//!   [`WalletLedger`](crate::port::outbound::ledger::WalletLedger) that moves balances when a
//!   transfer confirms.
//! - [`domain`] - Builders for chains, balances and session results.
//! - [`config`] - Canonical fast test configurations.
//! - [`keys`] - RSA key pair and entity secret for ledger encryption.

pub mod config;
pub mod domain;
pub mod keys;
pub mod ledger;
pub mod pool;
