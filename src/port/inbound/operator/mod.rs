//! Operator-facing inbound ports consumed by CLI adapters.

pub mod port;
pub mod settle;
pub mod watch;
