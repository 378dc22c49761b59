//! Session results and settlement records.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::id::{SessionId, TransactionId};

/// Length of the hex idempotency key sent to the ledger.
pub const IDEMPOTENCY_KEY_LEN: usize = 32;

/// Derive the ledger idempotency key for settling a session.
///
/// First 32 hex characters of `SHA-256("settle:" + session_id)`. Stable
/// across retries and process restarts, so a repeated transfer for the
/// same session is collapsed by the ledger.
#[must_use]
pub fn derive_idempotency_key(session_id: &SessionId) -> String {
    let digest = Sha256::digest(format!("settle:{session_id}").as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(IDEMPOTENCY_KEY_LEN);
    key
}

/// Final status of an arbitrage session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Completed,
    Failed,
    Cancelled,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Outcome of an off-chain arbitrage session, supplied by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub session_id: SessionId,
    pub chain_a: String,
    pub chain_b: String,
    pub net_profit: Decimal,
    pub status: SessionStatus,
    pub timestamp: DateTime<Utc>,
}

/// Output of one settlement attempt for one session.
///
/// `settled` is true only when a transfer was initiated and its
/// confirmation reached `COMPLETE`. Every other path leaves `settled`
/// false with `error` populated, except a dry run which sets `dry_run`
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    pub session_id: SessionId,
    pub net_profit: Decimal,
    pub settled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_balance_before: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_balance_after: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SettlementRecord {
    /// Record for a settlement that did not happen.
    #[must_use]
    pub fn unsettled(session_id: SessionId, net_profit: Decimal, error: impl Into<String>) -> Self {
        Self {
            session_id,
            net_profit,
            settled: false,
            settled_amount: None,
            transaction_id: None,
            tx_hash: None,
            vault_balance_before: None,
            vault_balance_after: None,
            settled_at: None,
            dry_run: false,
            error: Some(error.into()),
        }
    }

    /// Change in vault balance across the settlement, when both sides are known.
    #[must_use]
    pub fn vault_delta(&self) -> Option<Decimal> {
        Some(self.vault_balance_after? - self.vault_balance_before?)
    }
}
