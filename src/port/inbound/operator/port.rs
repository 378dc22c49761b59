//! Unified operator capability surface for inbound adapters.

use super::settle::SettlementOperator;
use super::watch::WatchOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort: WatchOperator + SettlementOperator {}

impl<T> OperatorPort for T where T: WatchOperator + SettlementOperator {}
