//! Outbound adapters (driven side).

#[cfg(feature = "evm")]
pub mod evm;
pub mod ledger;
pub mod session;
