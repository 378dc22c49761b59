//! Handler for the `settle` command.

use chrono::Utc;

use crate::adapter::inbound::cli::command::SettleArgs;
use crate::application::settlement::orchestrator::NO_PROFIT;
use crate::domain::id::SessionId;
use crate::domain::settlement::{SessionResult, SettlementRecord};
use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;
use crate::port::inbound::operator::settle::SettleRequest;

/// Session result described by the command-line arguments.
pub fn session_from_args(args: &SettleArgs) -> SessionResult {
    SessionResult {
        session_id: SessionId::new(args.session.clone()),
        chain_a: args.chain_a.clone(),
        chain_b: args.chain_b.clone(),
        net_profit: args.profit,
        status: args.status.into(),
        timestamp: Utc::now(),
    }
}

/// Execute the settle command and return the settlement record.
///
/// `--dry-run` on the command line forces a dry run regardless of the
/// configuration file.
pub async fn execute(operator: &dyn OperatorPort, args: &SettleArgs) -> Result<SettlementRecord> {
    let request = SettleRequest {
        session: session_from_args(args),
        amount_override: args.amount,
        dry_run: args.dry_run,
    };
    operator.settle(request).await
}

/// Whether the command should exit successfully for `record`.
///
/// A dry run and a session without profit are not failures.
#[must_use]
pub fn succeeded(record: &SettlementRecord) -> bool {
    record.settled || record.dry_run || record.error.as_deref() == Some(NO_PROFIT)
}
