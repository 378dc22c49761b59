//! Programmable-wallet REST client.
//!
//! Every call runs under a [`RetryExecutor`] that retries only transient
//! failures (connect/timeout errors, HTTP 5xx and 429). API rejections are
//! surfaced immediately.
//!
//! The entity public key is fetched on the first transfer and cached. The
//! entity secret is encrypted again for every transfer request, retries
//! included.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder};
use rsa::RsaPublicKey;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::dto::{
    ApiErrorBody, BalancesData, Envelope, PublicKeyData, TransactionData, TransferBody,
    TransferData, WalletData,
};
use super::entity_secret::{parse_public_key, EntitySecret};
use super::settings::{LedgerConfig, API_KEY_ENV, ENTITY_SECRET_ENV};
use crate::application::retry::RetryExecutor;
use crate::domain::id::{TransactionId, WalletId};
use crate::domain::wallet::{TransactionState, TransferInitiation, TransferRequest, WalletBalance};
use crate::error::{ConfigError, Error, LedgerError, Result};
use crate::port::outbound::ledger::WalletLedger;

const COMPONENT: &str = "CircleLedger";

/// HTTP client for the custodial wallet ledger.
pub struct CircleLedgerClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    entity_secret: EntitySecret,
    entity_public_key: OnceCell<RsaPublicKey>,
    source_wallet_id: WalletId,
    fee_level: String,
    retry: RetryExecutor,
}

impl CircleLedgerClient {
    /// Build a client, failing fast when a credential is missing.
    pub fn new(config: &LedgerConfig) -> Result<Self> {
        let api_key = non_empty(config.api_key.as_deref()).ok_or(ConfigError::MissingField {
            field: API_KEY_ENV,
        })?;
        let entity_secret = non_empty(config.entity_secret.as_deref())
            .ok_or(ConfigError::MissingField {
                field: ENTITY_SECRET_ENV,
            })
            .and_then(EntitySecret::from_hex)?;
        if config.source_wallet_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "ledger.source_wallet_id",
            }
            .into());
        }

        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(component = COMPONENT, error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            entity_secret,
            entity_public_key: OnceCell::new(),
            source_wallet_id: WalletId::new(config.source_wallet_id.clone()),
            fee_level: config.fee_level.clone(),
            retry: RetryExecutor::new(config.retry, COMPONENT),
        })
    }

    async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        self.retry
            .run_when(|| self.send(self.http.get(&url)), Error::is_transient)
            .await
    }

    async fn entity_public_key(&self) -> Result<&RsaPublicKey> {
        self.entity_public_key
            .get_or_try_init(|| async {
                let data: PublicKeyData = self.get("/config/entity/publicKey").await?;
                let key = parse_public_key(&data.public_key)?;
                debug!(component = COMPONENT, "Fetched entity public key");
                Ok::<_, Error>(key)
            })
            .await
    }

    /// Build a transfer body with a freshly encrypted entity secret.
    fn transfer_body<'a>(
        &'a self,
        request: &'a TransferRequest,
        public_key: &RsaPublicKey,
    ) -> Result<TransferBody<'a>> {
        Ok(TransferBody {
            idempotency_key: &request.idempotency_key,
            wallet_id: self.source_wallet_id.as_str(),
            token_id: request.token_id.as_str(),
            destination_address: &request.destination_address,
            amounts: [request.amount.normalize().to_string()],
            fee_level: &self.fee_level,
            entity_secret_ciphertext: self.entity_secret.encrypt(public_key)?,
        })
    }

    async fn send_transfer(
        &self,
        url: &str,
        request: &TransferRequest,
        public_key: &RsaPublicKey,
    ) -> Result<TransferData> {
        let body = self.transfer_body(request, public_key)?;
        self.send(self.http.post(url).json(&body)).await
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(LedgerError::Http)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(LedgerError::Http)?;

        if !(200..300).contains(&status) {
            return Err(error_from_response(status, body).into());
        }
        decode_envelope(&body).map_err(Into::into)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Map a non-2xx response to a ledger error.
///
/// Client errors carrying a `code` become [`LedgerError::Api`]; everything
/// else keeps the raw status so the retry boundary can classify it.
fn error_from_response(status: u16, body: String) -> LedgerError {
    if status < 500 && status != 429 {
        if let Ok(ApiErrorBody {
            code: Some(code),
            message,
        }) = serde_json::from_str(&body)
        {
            return LedgerError::Api {
                code,
                message: message.unwrap_or_default(),
            };
        }
    }
    LedgerError::Status { status, body }
}

/// Decode a 2xx body, treating an in-band `code` as a rejection.
fn decode_envelope<T: DeserializeOwned>(body: &str) -> std::result::Result<T, LedgerError> {
    match serde_json::from_str::<Envelope<T>>(body) {
        Ok(envelope) => Ok(envelope.data),
        Err(decode_err) => match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(ApiErrorBody {
                code: Some(code),
                message,
            }) => Err(LedgerError::Api {
                code,
                message: message.unwrap_or_default(),
            }),
            _ => Err(LedgerError::Decode(decode_err.to_string())),
        },
    }
}

#[async_trait]
impl WalletLedger for CircleLedgerClient {
    fn source_wallet_id(&self) -> &WalletId {
        &self.source_wallet_id
    }

    async fn get_balance(&self, wallet_id: &WalletId) -> Result<Vec<WalletBalance>> {
        let data: BalancesData = self.get(&format!("/wallets/{wallet_id}/balances")).await?;
        debug!(
            component = COMPONENT,
            wallet_id = %wallet_id,
            tokens = data.token_balances.len(),
            "Fetched balances"
        );
        Ok(data.token_balances.into_iter().map(Into::into).collect())
    }

    async fn get_wallet_address(&self, wallet_id: &WalletId) -> Result<String> {
        let data: WalletData = self.get(&format!("/wallets/{wallet_id}")).await?;
        Ok(data.wallet.address)
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<TransferInitiation> {
        let public_key = self.entity_public_key().await?;
        let url = format!("{}/developer/transactions/transfer", self.base_url);
        let result = self
            .retry
            .run_when(
                || self.send_transfer(&url, request, public_key),
                Error::is_transient,
            )
            .await;
        match result {
            Ok(data) => {
                info!(
                    component = COMPONENT,
                    transaction_id = %data.id,
                    state = data.state.as_deref().unwrap_or("UNKNOWN"),
                    amount = %request.amount,
                    "Transfer initiated"
                );
                Ok(TransferInitiation::accepted(TransactionId::new(data.id)))
            }
            Err(Error::Ledger(LedgerError::Api { code, message })) => {
                warn!(component = COMPONENT, code, message = %message, "Transfer rejected");
                Ok(TransferInitiation::rejected(format!("ledger API {code}: {message}")))
            }
            Err(e) => Err(e),
        }
    }

    async fn transaction_state(&self, transaction_id: &TransactionId) -> Result<TransactionState> {
        let data: TransactionData = self.get(&format!("/transactions/{transaction_id}")).await?;
        debug!(
            component = COMPONENT,
            transaction_id = %transaction_id,
            state = %data.transaction.state,
            "Polled transaction"
        );
        Ok(TransactionState::from_ledger(
            data.transaction.state,
            data.transaction.tx_hash,
        ))
    }
}
