//! Wallet ledger configuration.

use serde::Deserialize;

use crate::application::retry::RetryOptions;

/// Environment variable holding the ledger API key.
pub const API_KEY_ENV: &str = "LEDGER_API_KEY";

/// Environment variable holding the raw entity secret as hex.
pub const ENTITY_SECRET_ENV: &str = "ENTITY_SECRET_HEX";

/// `[ledger]` section.
///
/// Secrets never come from the file; they are filled from the
/// environment when the configuration is loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Wallet that funds settlements.
    #[serde(default)]
    pub source_wallet_id: String,
    #[serde(default = "default_fee_level")]
    pub fee_level: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "RetryOptions::ledger_default")]
    pub retry: RetryOptions,
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Raw entity secret, hex. Encrypted per request, never sent as is.
    #[serde(skip)]
    pub entity_secret: Option<String>,
}

fn default_api_url() -> String {
    "https://api.circle.com/v1/w3s".into()
}

fn default_fee_level() -> String {
    "MEDIUM".into()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            source_wallet_id: String::new(),
            fee_level: default_fee_level(),
            timeout_ms: default_timeout_ms(),
            retry: RetryOptions::ledger_default(),
            api_key: None,
            entity_secret: None,
        }
    }
}
