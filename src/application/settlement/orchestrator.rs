//! Profit settlement into the vault wallet.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::domain::id::{SessionId, WalletId};
use crate::domain::settlement::{derive_idempotency_key, SettlementRecord};
use crate::domain::wallet::{find_balance, TransferRequest};
use crate::error::{Error, Result, SettlementError};
use crate::port::outbound::ledger::WalletLedger;

const COMPONENT: &str = "SettlementOrchestrator";

/// Reason recorded when there is nothing to move.
pub const NO_PROFIT: &str = "No profit to settle";

/// Settlement targets and the outer retry/confirmation schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementConfig {
    pub vault_wallet_id: WalletId,
    pub token_symbol: String,
    /// Full-sequence attempts before giving up.
    pub max_attempts: u32,
    /// Backoff after attempt `n` is `backoff_step * n`.
    pub backoff_step: Duration,
    pub confirmation_attempts: u32,
    pub confirmation_interval: Duration,
    /// Resolve amounts and addresses but skip the transfer.
    pub dry_run: bool,
}

impl SettlementConfig {
    pub fn new(vault_wallet_id: WalletId) -> Self {
        Self {
            vault_wallet_id,
            token_symbol: "USDC".into(),
            max_attempts: 3,
            backoff_step: Duration::from_millis(2000),
            confirmation_attempts: 10,
            confirmation_interval: Duration::from_millis(5000),
            dry_run: false,
        }
    }
}

/// Per-call adjustments to a settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleOptions {
    /// Settle this amount instead of the session profit. Still capped by
    /// the available source balance.
    pub amount_override: Option<Decimal>,
}

/// Moves realized session profit from the source wallet to the vault.
pub struct SettlementOrchestrator {
    ledger: Arc<dyn WalletLedger>,
    config: SettlementConfig,
}

impl SettlementOrchestrator {
    pub fn new(ledger: Arc<dyn WalletLedger>, config: SettlementConfig) -> Self {
        Self { ledger, config }
    }

    #[must_use]
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Settle `net_profit` for a session.
    pub async fn settle_profit(&self, session_id: &SessionId, net_profit: Decimal) -> SettlementRecord {
        self.settle_with(session_id, net_profit, SettleOptions::default())
            .await
    }

    /// Settle with per-call options.
    ///
    /// Never fails: every outcome, including exhausted retries, is a
    /// [`SettlementRecord`]. Each retry restarts from the balance lookup.
    /// Business-rule failures (missing token, nothing available) end the
    /// settlement at once without retrying.
    pub async fn settle_with(
        &self,
        session_id: &SessionId,
        net_profit: Decimal,
        options: SettleOptions,
    ) -> SettlementRecord {
        if net_profit <= Decimal::ZERO {
            info!(
                component = COMPONENT,
                session_id = %session_id,
                net_profit = %net_profit,
                "No profit to settle"
            );
            return SettlementRecord::unsettled(session_id.clone(), net_profit, NO_PROFIT);
        }

        info!(
            component = COMPONENT,
            session_id = %session_id,
            net_profit = %net_profit,
            dry_run = self.config.dry_run,
            "Starting settlement"
        );

        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self.attempt(session_id, net_profit, options).await {
                Ok(record) => return record,
                Err(e) if is_business_rule(&e) => {
                    warn!(
                        component = COMPONENT,
                        session_id = %session_id,
                        error = %e,
                        "Settlement rejected"
                    );
                    return SettlementRecord::unsettled(session_id.clone(), net_profit, e.to_string());
                }
                Err(e) => {
                    warn!(
                        component = COMPONENT,
                        session_id = %session_id,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Settlement attempt failed"
                    );
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        sleep(self.config.backoff_step * attempt).await;
                    }
                }
            }
        }

        error!(
            component = COMPONENT,
            session_id = %session_id,
            attempts = max_attempts,
            error = %last_error,
            "Settlement failed"
        );
        SettlementRecord::unsettled(
            session_id.clone(),
            net_profit,
            format!("All {max_attempts} attempts failed: {last_error}"),
        )
    }

    /// One full pass: balances, amount, vault, transfer, confirmation.
    async fn attempt(
        &self,
        session_id: &SessionId,
        net_profit: Decimal,
        options: SettleOptions,
    ) -> Result<SettlementRecord> {
        let symbol = self.config.token_symbol.as_str();

        let source_balances = self.ledger.get_balance(self.ledger.source_wallet_id()).await?;
        let token = find_balance(&source_balances, symbol)
            .ok_or_else(|| SettlementError::TokenNotFound {
                symbol: symbol.to_string(),
            })?
            .clone();

        let requested = options.amount_override.unwrap_or(net_profit);
        if requested <= Decimal::ZERO {
            return Err(SettlementError::InvalidAmount(format!(
                "requested amount {requested} is not positive"
            ))
            .into());
        }
        let amount = requested.min(token.amount).normalize();
        if amount <= Decimal::ZERO {
            return Err(SettlementError::InsufficientBalance {
                available: token.amount,
            }
            .into());
        }

        let vault_before = self.vault_balance().await?;
        let vault_address = self
            .ledger
            .get_wallet_address(&self.config.vault_wallet_id)
            .await?;
        let idempotency_key = derive_idempotency_key(session_id);

        if self.config.dry_run {
            info!(
                component = COMPONENT,
                session_id = %session_id,
                amount = %amount,
                symbol,
                vault_address = %vault_address,
                idempotency_key = %idempotency_key,
                "Dry run, skipping transfer"
            );
            let mut record = SettlementRecord::unsettled(session_id.clone(), net_profit, "");
            record.error = None;
            record.dry_run = true;
            record.settled_amount = Some(amount);
            record.vault_balance_before = Some(vault_before);
            return Ok(record);
        }

        info!(
            component = COMPONENT,
            session_id = %session_id,
            amount = %amount,
            symbol,
            vault_address = %vault_address,
            "Initiating transfer"
        );

        let request = TransferRequest {
            token_id: token.token.id.clone(),
            amount,
            destination_address: vault_address,
            idempotency_key,
        };
        let initiation = self.ledger.transfer(&request).await?;
        let transaction_id = match (initiation.success, initiation.transaction_id) {
            (true, Some(id)) => id,
            (_, _) => {
                let reason = initiation
                    .error
                    .unwrap_or_else(|| "no transaction id returned".to_string());
                return Err(SettlementError::TransferRejected(reason).into());
            }
        };

        let result = self
            .ledger
            .wait_for_transaction(
                &transaction_id,
                amount,
                self.config.confirmation_attempts,
                self.config.confirmation_interval,
            )
            .await?;
        if !result.success {
            return Err(SettlementError::Confirmation {
                status: result.status,
                reason: result
                    .error
                    .unwrap_or_else(|| format!("Transaction {}", result.status)),
            }
            .into());
        }

        let vault_after = self.vault_balance().await?;

        info!(
            component = COMPONENT,
            session_id = %session_id,
            transaction_id = %transaction_id,
            amount = %amount,
            vault_before = %vault_before,
            vault_after = %vault_after,
            "Settlement complete"
        );

        Ok(SettlementRecord {
            session_id: session_id.clone(),
            net_profit,
            settled: true,
            settled_amount: Some(amount),
            transaction_id: Some(transaction_id),
            tx_hash: result.tx_hash,
            vault_balance_before: Some(vault_before),
            vault_balance_after: Some(vault_after),
            settled_at: Some(Utc::now()),
            dry_run: false,
            error: None,
        })
    }

    /// Vault holding of the settlement token; zero when absent.
    async fn vault_balance(&self) -> Result<Decimal> {
        let balances = self.ledger.get_balance(&self.config.vault_wallet_id).await?;
        Ok(find_balance(&balances, &self.config.token_symbol)
            .map_or(Decimal::ZERO, |balance| balance.amount))
    }
}

fn is_business_rule(err: &Error) -> bool {
    matches!(
        err,
        Error::Settlement(
            SettlementError::TokenNotFound { .. }
                | SettlementError::InsufficientBalance { .. }
                | SettlementError::InvalidAmount(_)
        )
    )
}
