use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::wallet::TransferStatus;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Pool price read and derivation errors.
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("sqrtPriceX96 is 0 for chain {chain}, pool may not be initialized")]
    UninitializedPool { chain: String },

    #[error("pool state read failed: {0}")]
    Rpc(String),

    #[error("price conversion failed: {0}")]
    Conversion(String),
}

/// Wallet ledger API errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ledger API {code}: {message}")]
    Api { code: i64, message: String },

    #[error("ledger returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode ledger response: {0}")]
    Decode(String),

    #[error("entity secret encryption failed: {0}")]
    Encryption(String),
}

/// Business-rule and confirmation failures inside one settlement attempt.
#[derive(Error, Debug, Clone)]
pub enum SettlementError {
    #[error("{symbol} not found in source wallet")]
    TokenNotFound { symbol: String },

    #[error("insufficient balance: available={available}")]
    InsufficientBalance { available: Decimal },

    #[error("transfer initiation failed: {0}")]
    TransferRejected(String),

    #[error("transaction {status}: {reason}")]
    Confirmation {
        status: TransferStatus,
        reason: String,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying the failed call can plausibly succeed.
    ///
    /// Network hiccups and server-side failures are transient; rejections,
    /// business rules and configuration problems are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Price(PriceError::Rpc(_)) => true,
            Self::Ledger(LedgerError::Http(err)) => {
                err.is_timeout()
                    || err.is_connect()
                    || err.is_request()
                    || err.status().is_some_and(|s| s.is_server_error())
            }
            Self::Ledger(LedgerError::Status { status, .. }) => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_failures_are_transient() {
        let err: Error = PriceError::Rpc("connection reset".into()).into();
        assert!(err.is_transient());
    }

    #[test]
    fn uninitialized_pool_is_not_transient() {
        let err: Error = PriceError::UninitializedPool {
            chain: "base-sepolia".into(),
        }
        .into();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("base-sepolia"));
    }

    #[test]
    fn server_errors_are_transient_client_errors_are_not() {
        let server: Error = LedgerError::Status {
            status: 503,
            body: String::new(),
        }
        .into();
        let throttled: Error = LedgerError::Status {
            status: 429,
            body: String::new(),
        }
        .into();
        let client: Error = LedgerError::Status {
            status: 400,
            body: "bad request".into(),
        }
        .into();
        assert!(server.is_transient());
        assert!(throttled.is_transient());
        assert!(!client.is_transient());
    }

    #[test]
    fn api_rejections_are_not_transient() {
        let err: Error = LedgerError::Api {
            code: 155_201,
            message: "insufficient funds".into(),
        }
        .into();
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "ledger API 155201: insufficient funds");
    }

    #[test]
    fn token_not_found_names_the_symbol() {
        let err = SettlementError::TokenNotFound {
            symbol: "USDC".into(),
        };
        assert_eq!(err.to_string(), "USDC not found in source wallet");
    }
}
