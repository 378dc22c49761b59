//! Wallet ledger port.
//!
//! The contract the settlement orchestrator depends on: balance lookup,
//! wallet address resolution, transfer initiation and transfer
//! confirmation. Every method is independently retryable by the caller.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::time::sleep;

use crate::domain::id::{TransactionId, WalletId};
use crate::domain::wallet::{
    TransactionState, TransferInitiation, TransferRequest, TransferResult, TransferStatus,
    WalletBalance,
};
use crate::error::Result;

/// Port for a custodial wallet ledger.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait WalletLedger: Send + Sync {
    /// Wallet that funds transfers.
    fn source_wallet_id(&self) -> &WalletId;

    /// All token balances held by a wallet.
    async fn get_balance(&self, wallet_id: &WalletId) -> Result<Vec<WalletBalance>>;

    /// On-chain address of a wallet.
    async fn get_wallet_address(&self, wallet_id: &WalletId) -> Result<String>;

    /// Initiate a transfer from the source wallet.
    ///
    /// A rejection the ledger reports in-band comes back as
    /// `Ok(TransferInitiation { success: false, .. })`.
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferInitiation>;

    /// Read the current state of a transaction once.
    async fn transaction_state(&self, transaction_id: &TransactionId) -> Result<TransactionState>;

    /// Poll a transaction until it reaches a terminal state.
    ///
    /// Waits `interval` before each read. `COMPLETE` is success, `FAILED`
    /// and `CANCELLED` end immediately as failures, and running out of
    /// `max_attempts` yields a [`TransferStatus::Timeout`] result. `amount`
    /// is the amount the transfer was initiated with and is carried onto
    /// the result.
    async fn wait_for_transaction(
        &self,
        transaction_id: &TransactionId,
        amount: Decimal,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<TransferResult> {
        for _ in 0..max_attempts {
            sleep(interval).await;

            let state = self.transaction_state(transaction_id).await?;
            match state.status {
                TransferStatus::Complete => {
                    return Ok(TransferResult::complete(
                        transaction_id.clone(),
                        amount,
                        state.tx_hash,
                    ));
                }
                TransferStatus::Failed | TransferStatus::Cancelled => {
                    let mut result = TransferResult::terminal_failure(
                        transaction_id.clone(),
                        amount,
                        state.status,
                    );
                    result.tx_hash = state.tx_hash;
                    return Ok(result);
                }
                TransferStatus::Initiated | TransferStatus::Timeout => {}
            }
        }

        Ok(TransferResult::timed_out(
            transaction_id.clone(),
            amount,
            max_attempts,
        ))
    }
}
