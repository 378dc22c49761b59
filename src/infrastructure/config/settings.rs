//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file with environment variable
//! overrides for RPC endpoints and the ledger secrets, which are never
//! read from the file.
//!
//! # Example
//!
//! ```no_run
//! use spreadvault::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::settlement::SettlementSettings;
use super::watcher::{ChainsConfig, WatcherSettings};
use crate::adapter::outbound::ledger::settings::{LedgerConfig, API_KEY_ENV, ENTITY_SECRET_ENV};
use crate::error::{ConfigError, Result};

/// Overrides `[chains.a] rpc_url`.
pub const CHAIN_A_RPC_URL_ENV: &str = "CHAIN_A_RPC_URL";

/// Overrides `[chains.b] rpc_url`.
pub const CHAIN_B_RPC_URL_ENV: &str = "CHAIN_B_RPC_URL";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Poll cadence, threshold and pool read retry.
    #[serde(default)]
    pub watcher: WatcherSettings,

    /// The two pools being compared.
    pub chains: ChainsConfig,

    /// Wallet ledger endpoint. Secrets come from `LEDGER_API_KEY` and
    /// `ENTITY_SECRET_HEX`.
    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub settlement: SettlementSettings,
}

impl Config {
    /// Parse configuration from TOML content, applying process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation
    /// fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration using `env` to resolve overrides and secrets.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(url) = env(CHAIN_A_RPC_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.chains.a.rpc_url = url;
        }
        if let Some(url) = env(CHAIN_B_RPC_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.chains.b.rpc_url = url;
        }
        config.ledger.api_key = env(API_KEY_ENV);
        config.ledger.entity_secret = env(ENTITY_SECRET_ENV);

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        self.watcher.validate()?;
        self.chains.validate()?;
        self.settlement.validate()?;

        if self.ledger.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "ledger.api_url",
            }
            .into());
        }
        if self.ledger.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ledger.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        self.ledger.retry.validate("ledger.retry")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;
    use std::time::Duration;

    const BASE: &str = r#"
[chains.a]
name = "base-sepolia"
chain_id = 84532
rpc_url = "https://sepolia.base.org"
pool_id = "0x1111111111111111111111111111111111111111111111111111111111111111"
state_view = "0x571291b572ed32ce6751a2cb2486ebee8defb9b4"
base_token = { address = "0x0000000000000000000000000000000000000000", decimals = 18, symbol = "ETH" }
quote_token = { address = "0x036cbd53842c5426634e7929541ec2318f3dcf7e", decimals = 6, symbol = "USDC" }

[chains.b]
name = "unichain-sepolia"
chain_id = 1301
rpc_url = "https://sepolia.unichain.org"
pool_id = "0x2222222222222222222222222222222222222222222222222222222222222222"
state_view = "0xc199f1072a74d4e905aba1a84d9a45e2546b6222"
base_token = { address = "0x0000000000000000000000000000000000000000", decimals = 18 }
quote_token = { address = "0x31d0220469e10c4e71834a79b1f276d740d3768f", decimals = 6 }
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse_toml_with_env(BASE, no_env).unwrap();
        let watcher = config.watcher.watcher_config();
        assert_eq!(watcher.poll_interval, Duration::from_millis(5000));
        assert!((watcher.threshold_bps - 50.0).abs() < f64::EPSILON);
        assert_eq!(config.watcher.retry.max_retries, 3);
        assert_eq!(config.ledger.fee_level, "MEDIUM");
        assert_eq!(config.settlement.token_symbol, "USDC");
        assert_eq!(config.settlement.max_attempts, 3);
        assert!(config.ledger.api_key.is_none());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn env_supplies_secrets_and_rpc_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_KEY_ENV, "key-123"),
            (ENTITY_SECRET_ENV, "ab12"),
            (CHAIN_B_RPC_URL_ENV, "https://rpc.override"),
        ]);
        let config =
            Config::parse_toml_with_env(BASE, |k| env.get(k).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.ledger.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.ledger.entity_secret.as_deref(), Some("ab12"));
        assert_eq!(config.chains.a.rpc_url, "https://sepolia.base.org");
        assert_eq!(config.chains.b.rpc_url, "https://rpc.override");
    }

    #[test]
    fn env_rpc_url_fills_missing_file_value() {
        let content = BASE.replace("rpc_url = \"https://sepolia.base.org\"\n", "");
        let err = Config::parse_toml_with_env(&content, no_env).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "chains.a.rpc_url" })
        ));

        let config = Config::parse_toml_with_env(&content, |k| {
            (k == CHAIN_A_RPC_URL_ENV).then(|| "https://rpc.a".to_string())
        })
        .unwrap();
        assert_eq!(config.chains.a.rpc_url, "https://rpc.a");
    }

    #[test]
    fn rejects_negative_threshold() {
        let content = format!("[watcher]\nthreshold_bps = -1.0\n{BASE}");
        let err = Config::parse_toml_with_env(&content, no_env).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "watcher.threshold_bps", .. })
        ));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let content = format!("[watcher]\npoll_interval_ms = 0\n{BASE}");
        assert!(Config::parse_toml_with_env(&content, no_env).is_err());
    }

    #[test]
    fn rejects_identical_token_addresses() {
        let content = BASE.replace(
            "0x31d0220469e10c4e71834a79b1f276d740d3768f",
            "0x0000000000000000000000000000000000000000",
        );
        let err = Config::parse_toml_with_env(&content, no_env).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "chains.b.quote_token", .. })
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Config::parse_toml_with_env("[chains.a", no_env).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn settlement_requires_vault_only_when_used() {
        let config = Config::parse_toml_with_env(BASE, no_env).unwrap();
        assert!(matches!(
            config.settlement.settlement_config(),
            Err(ConfigError::MissingField { field: "settlement.vault_wallet_id" })
        ));

        let content = format!("[settlement]\nvault_wallet_id = \"vault-1\"\ndry_run = true\n{BASE}");
        let config = Config::parse_toml_with_env(&content, no_env).unwrap();
        let settlement = config.settlement.settlement_config().unwrap();
        assert_eq!(settlement.vault_wallet_id.as_str(), "vault-1");
        assert!(settlement.dry_run);
        assert_eq!(settlement.backoff_step, Duration::from_millis(2000));
    }
}
