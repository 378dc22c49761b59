//! Ledger balances and transfer lifecycle types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{TokenId, TransactionId};

/// Token as described by the wallet ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub id: TokenId,
    pub blockchain: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Balance of one token held by a ledger wallet.
///
/// Read fresh from the ledger on every call; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub token: TokenDescriptor,
    pub amount: Decimal,
}

/// Find the balance for a token symbol (exact, case-sensitive match).
#[must_use]
pub fn find_balance<'a>(balances: &'a [WalletBalance], symbol: &str) -> Option<&'a WalletBalance> {
    balances.iter().find(|b| b.token.symbol == symbol)
}

/// Lifecycle of a ledger transfer.
///
/// `Initiated` covers every pending state the ledger reports. `Timeout` is
/// never reported by the ledger itself; it marks a confirmation poll that
/// ran out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Initiated,
    Complete,
    Failed,
    Cancelled,
    Timeout,
}

impl TransferStatus {
    /// Map a raw ledger transaction state onto the lifecycle.
    #[must_use]
    pub fn from_ledger_state(state: &str) -> Self {
        match state {
            "COMPLETE" => Self::Complete,
            "FAILED" | "DENIED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Initiated,
        }
    }

    /// True once the ledger will not move the transfer any further.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Initiated)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initiated => "INITIATED",
            Self::Complete => "COMPLETE",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Timeout => "TIMEOUT",
        };
        write!(f, "{s}")
    }
}

/// A transfer the ledger should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub token_id: TokenId,
    pub amount: Decimal,
    pub destination_address: String,
    pub idempotency_key: String,
}

/// Ledger response to a transfer initiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInitiation {
    pub success: bool,
    pub transaction_id: Option<TransactionId>,
    pub error: Option<String>,
}

impl TransferInitiation {
    #[must_use]
    pub fn accepted(transaction_id: TransactionId) -> Self {
        Self {
            success: true,
            transaction_id: Some(transaction_id),
            error: None,
        }
    }

    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: None,
            error: Some(error.into()),
        }
    }
}

/// A single status read of a ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionState {
    pub status: TransferStatus,
    /// State string exactly as the ledger reported it.
    pub raw_state: String,
    pub tx_hash: Option<String>,
}

impl TransactionState {
    #[must_use]
    pub fn from_ledger(raw_state: impl Into<String>, tx_hash: Option<String>) -> Self {
        let raw_state = raw_state.into();
        Self {
            status: TransferStatus::from_ledger_state(&raw_state),
            raw_state,
            tx_hash,
        }
    }
}

/// Outcome of waiting on one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub success: bool,
    pub transaction_id: TransactionId,
    pub tx_hash: Option<String>,
    pub status: TransferStatus,
    /// Amount the transfer was initiated with.
    pub amount: Decimal,
    pub error: Option<String>,
}

impl TransferResult {
    #[must_use]
    pub fn complete(transaction_id: TransactionId, amount: Decimal, tx_hash: Option<String>) -> Self {
        Self {
            success: true,
            transaction_id,
            tx_hash,
            status: TransferStatus::Complete,
            amount,
            error: None,
        }
    }

    #[must_use]
    pub fn terminal_failure(
        transaction_id: TransactionId,
        amount: Decimal,
        status: TransferStatus,
    ) -> Self {
        Self {
            success: false,
            transaction_id,
            tx_hash: None,
            status,
            amount,
            error: Some(format!("Transaction {status}")),
        }
    }

    #[must_use]
    pub fn timed_out(transaction_id: TransactionId, amount: Decimal, attempts: u32) -> Self {
        Self {
            success: false,
            transaction_id,
            tx_hash: None,
            status: TransferStatus::Timeout,
            amount,
            error: Some(format!("Timeout after {attempts} attempts")),
        }
    }
}
