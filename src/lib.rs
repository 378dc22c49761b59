//! Spreadvault - cross-chain price discrepancy watcher and profit settlement.
//!
//! The crate watches the price of one token pair on two EVM chains, raises
//! discrepancy notifications when the spread crosses a threshold, and
//! settles realized session profit into a custodial vault through a
//! programmable-wallet ledger.
//!
//! # Architecture
//!
//! - [`domain`] - Pure types and math: prices, Q64.96 conversion, spreads,
//!   wallet balances, transfers, settlement records
//! - [`port`] - Traits for external collaborators (pool reads, wallet ledger,
//!   session results) and the operator use cases behind the CLI
//! - [`application`] - Retry executor, price watcher, settlement orchestrator
//! - [`adapter`] - CLI plus concrete collaborators: StateView reader
//!   (requires `evm` feature), ledger REST client, manual session source
//! - [`infrastructure`] - Configuration loading, logging setup and wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `evm` - Enable on-chain pool reads through alloy (default)
//! - `testkit` - Expose scripted fakes for integration tests
//!
//! # Example
//!
//! ```no_run
//! use spreadvault::application::retry::RetryOptions;
//! use spreadvault::domain::settlement::derive_idempotency_key;
//! use spreadvault::domain::id::SessionId;
//!
//! let key = derive_idempotency_key(&SessionId::from("session-42"));
//! assert_eq!(key.len(), 32);
//! let options = RetryOptions::default();
//! assert_eq!(options.max_retries, 3);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
