//! Settlement projection types for operator-facing adapters.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::settlement::{SessionResult, SettlementRecord};
use crate::error::Result;

/// One session to settle, as described by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleRequest {
    pub session: SessionResult,

    /// Settle this amount instead of the session profit.
    pub amount_override: Option<Decimal>,

    /// Force a dry run regardless of the configuration file.
    pub dry_run: bool,
}

/// Settlement use cases.
#[async_trait]
pub trait SettlementOperator: Send + Sync {
    /// Settle one session. Settlement failures are reported in the record;
    /// only wiring problems (bad config, missing secrets) are errors.
    async fn settle(&self, request: SettleRequest) -> Result<SettlementRecord>;
}
