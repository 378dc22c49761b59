//! Settle a session straight from its reported result.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::orchestrator::{SettleOptions, SettlementOrchestrator};
use crate::domain::id::SessionId;
use crate::domain::settlement::{SessionStatus, SettlementRecord};
use crate::port::outbound::session::SessionResultSource;

/// Looks up a session result and settles it when the session completed.
pub struct AutoSettler {
    sessions: Arc<dyn SessionResultSource>,
    orchestrator: SettlementOrchestrator,
}

impl AutoSettler {
    pub fn new(sessions: Arc<dyn SessionResultSource>, orchestrator: SettlementOrchestrator) -> Self {
        Self {
            sessions,
            orchestrator,
        }
    }

    /// Settle `session_id`. Sessions that did not complete are skipped
    /// with the status as the reason.
    pub async fn settle_session(
        &self,
        session_id: &SessionId,
        options: SettleOptions,
    ) -> SettlementRecord {
        let result = match self.sessions.get_result(session_id).await {
            Ok(result) => result,
            Err(e) => {
                warn!(component = "AutoSettle", session_id = %session_id, error = %e, "Session lookup failed");
                return SettlementRecord::unsettled(
                    session_id.clone(),
                    Decimal::ZERO,
                    format!("Session lookup failed: {e}"),
                );
            }
        };

        if result.status != SessionStatus::Completed {
            info!(
                component = "AutoSettle",
                session_id = %session_id,
                status = %result.status,
                "Session not completed, skipping settlement"
            );
            return SettlementRecord::unsettled(
                session_id.clone(),
                result.net_profit,
                format!("Session status: {}", result.status),
            );
        }

        info!(
            component = "AutoSettle",
            session_id = %session_id,
            chain_a = %result.chain_a,
            chain_b = %result.chain_b,
            net_profit = %result.net_profit,
            "Settling completed session"
        );
        self.orchestrator
            .settle_with(session_id, result.net_profit, options)
            .await
    }
}
