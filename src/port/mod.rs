//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where external collaborators plug in. Outbound
//! ports cover the on-chain pool read, the custodial wallet ledger and the
//! source of session results; application services depend on these traits
//! only, so tests can swap in scripted fakes. Inbound ports expose the
//! operator use cases to the CLI.
//!
//! # Available Ports
//!
//! - [`outbound::pool::PoolStateReader`] - Pool `slot0` view read for one chain
//! - [`outbound::ledger::WalletLedger`] - Balances, addresses, transfers and confirmation
//! - [`outbound::session::SessionResultSource`] - Realized profit of a finished session
//! - [`inbound::operator::port::OperatorPort`] - Watch and settle use cases

pub mod inbound;
pub mod outbound;
