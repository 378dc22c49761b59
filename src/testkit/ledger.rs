//! Mock [`WalletLedger`] for testing.
//!
//! [`InMemoryLedger`] keeps wallets and balances in memory. A transfer is
//! recorded as pending and applied to the balances the first time its
//! status is read as `COMPLETE`, so vault balances before and after a
//! settlement behave like the real ledger's.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::id::{TransactionId, WalletId};
use crate::domain::wallet::{
    TransactionState, TransferInitiation, TransferRequest, TransferStatus, WalletBalance,
};
use crate::error::{LedgerError, Result};
use crate::port::outbound::ledger::WalletLedger;

struct Wallet {
    address: String,
    balances: Vec<WalletBalance>,
}

#[derive(Default)]
struct LedgerState {
    wallets: HashMap<WalletId, Wallet>,
    balance_failures: u32,
    transfer_rejections: VecDeque<String>,
    states: VecDeque<String>,
    pending: HashMap<TransactionId, TransferRequest>,
    transfers: Vec<TransferRequest>,
    next_tx: u32,
}

/// In-memory wallet ledger with scripted transfer outcomes.
pub struct InMemoryLedger {
    source: WalletId,
    default_state: String,
    state: Mutex<LedgerState>,
    balance_calls: AtomicU32,
    address_calls: AtomicU32,
    transfer_calls: AtomicU32,
    status_calls: AtomicU32,
}

impl InMemoryLedger {
    /// Ledger whose source wallet is `source`, holding no balances.
    ///
    /// Transactions report `COMPLETE` unless scripted otherwise.
    pub fn new(source: &str) -> Self {
        let ledger = Self {
            source: WalletId::from(source),
            default_state: "COMPLETE".into(),
            state: Mutex::new(LedgerState::default()),
            balance_calls: AtomicU32::new(0),
            address_calls: AtomicU32::new(0),
            transfer_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
        };
        ledger.add_wallet(source, &format!("0x{source}"), Vec::new());
        ledger
    }

    /// Add or replace a wallet.
    pub fn with_wallet(self, id: &str, address: &str, balances: Vec<WalletBalance>) -> Self {
        self.add_wallet(id, address, balances);
        self
    }

    /// Replace the source wallet's balances.
    pub fn with_source_balances(self, balances: Vec<WalletBalance>) -> Self {
        if let Some(wallet) = self.state.lock().wallets.get_mut(&self.source) {
            wallet.balances = balances;
        }
        self
    }

    /// Fail the next `n` balance reads with HTTP 503.
    pub fn fail_balance_reads(self, n: u32) -> Self {
        self.state.lock().balance_failures = n;
        self
    }

    /// Reject the next transfer initiations in-band, one per reason.
    pub fn reject_transfers(self, reasons: &[&str]) -> Self {
        self.state
            .lock()
            .transfer_rejections
            .extend(reasons.iter().map(|r| (*r).to_string()));
        self
    }

    /// Raw states returned by successive status reads before the default.
    pub fn with_transaction_states(self, states: &[&str]) -> Self {
        self.state
            .lock()
            .states
            .extend(states.iter().map(|s| (*s).to_string()));
        self
    }

    /// State reported once the scripted states run out.
    pub fn with_default_state(mut self, state: &str) -> Self {
        self.default_state = state.to_string();
        self
    }

    fn add_wallet(&self, id: &str, address: &str, balances: Vec<WalletBalance>) {
        self.state.lock().wallets.insert(
            WalletId::from(id),
            Wallet {
                address: address.to_string(),
                balances,
            },
        );
    }

    /// Current amount of `symbol` held by `wallet`; zero when absent.
    pub fn balance_of(&self, wallet: &str, symbol: &str) -> Decimal {
        self.state
            .lock()
            .wallets
            .get(&WalletId::from(wallet))
            .and_then(|w| w.balances.iter().find(|b| b.token.symbol == symbol))
            .map_or(Decimal::ZERO, |b| b.amount)
    }

    /// Every transfer request received, in order.
    pub fn transfers(&self) -> Vec<TransferRequest> {
        self.state.lock().transfers.clone()
    }

    pub fn balance_calls(&self) -> u32 {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn address_calls(&self) -> u32 {
        self.address_calls.load(Ordering::SeqCst)
    }

    pub fn transfer_calls(&self) -> u32 {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Total calls across every ledger method.
    pub fn total_calls(&self) -> u32 {
        self.balance_calls() + self.address_calls() + self.transfer_calls() + self.status_calls()
    }
}

impl LedgerState {
    fn apply(&mut self, source: &WalletId, request: &TransferRequest) {
        let mut symbol = None;
        if let Some(wallet) = self.wallets.get_mut(source) {
            if let Some(held) = wallet
                .balances
                .iter_mut()
                .find(|b| b.token.id == request.token_id)
            {
                held.amount -= request.amount;
                symbol = Some(held.token.clone());
            }
        }

        let Some(token) = symbol else { return };
        let destination = self
            .wallets
            .values_mut()
            .find(|w| w.address == request.destination_address);
        if let Some(wallet) = destination {
            match wallet
                .balances
                .iter_mut()
                .find(|b| b.token.symbol == token.symbol)
            {
                Some(held) => held.amount += request.amount,
                None => wallet.balances.push(WalletBalance {
                    token,
                    amount: request.amount,
                }),
            }
        }
    }
}

#[async_trait]
impl WalletLedger for InMemoryLedger {
    fn source_wallet_id(&self) -> &WalletId {
        &self.source
    }

    async fn get_balance(&self, wallet_id: &WalletId) -> Result<Vec<WalletBalance>> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if state.balance_failures > 0 {
            state.balance_failures -= 1;
            return Err(LedgerError::Status {
                status: 503,
                body: "service unavailable".into(),
            }
            .into());
        }
        Ok(state
            .wallets
            .get(wallet_id)
            .map(|w| w.balances.clone())
            .unwrap_or_default())
    }

    async fn get_wallet_address(&self, wallet_id: &WalletId) -> Result<String> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .wallets
            .get(wallet_id)
            .map(|w| w.address.clone())
            .ok_or_else(|| {
                LedgerError::Api {
                    code: 156_001,
                    message: format!("wallet {wallet_id} not found"),
                }
                .into()
            })
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<TransferInitiation> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        state.transfers.push(request.clone());

        if let Some(reason) = state.transfer_rejections.pop_front() {
            return Ok(TransferInitiation::rejected(reason));
        }

        state.next_tx += 1;
        let id = TransactionId::new(format!("tx-{}", state.next_tx));
        state.pending.insert(id.clone(), request.clone());
        Ok(TransferInitiation::accepted(id))
    }

    async fn transaction_state(&self, transaction_id: &TransactionId) -> Result<TransactionState> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        let raw = state
            .states
            .pop_front()
            .unwrap_or_else(|| self.default_state.clone());
        let status = TransferStatus::from_ledger_state(&raw);

        let tx_hash = (status == TransferStatus::Complete).then(|| format!("0xhash-{transaction_id}"));
        if status == TransferStatus::Complete {
            if let Some(request) = state.pending.remove(transaction_id) {
                state.apply(&self.source, &request);
            }
        }

        Ok(TransactionState::from_ledger(raw, tx_hash))
    }
}
