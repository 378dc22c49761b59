//! Settlement configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::settlement::orchestrator::SettlementConfig;
use crate::domain::id::WalletId;
use crate::error::ConfigError;

/// `[settlement]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementSettings {
    /// Destination wallet for settled profit.
    #[serde(default)]
    pub vault_wallet_id: String,
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_step_ms")]
    pub backoff_step_ms: u64,
    #[serde(default = "default_confirmation_attempts")]
    pub confirmation_attempts: u32,
    #[serde(default = "default_confirmation_interval_ms")]
    pub confirmation_interval_ms: u64,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_token_symbol() -> String {
    "USDC".into()
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_backoff_step_ms() -> u64 {
    2000
}

const fn default_confirmation_attempts() -> u32 {
    10
}

const fn default_confirmation_interval_ms() -> u64 {
    5000
}

impl Default for SettlementSettings {
    fn default() -> Self {
        Self {
            vault_wallet_id: String::new(),
            token_symbol: default_token_symbol(),
            max_attempts: default_max_attempts(),
            backoff_step_ms: default_backoff_step_ms(),
            confirmation_attempts: default_confirmation_attempts(),
            confirmation_interval_ms: default_confirmation_interval_ms(),
            dry_run: false,
        }
    }
}

impl SettlementSettings {
    /// Orchestrator settings. The vault wallet is required here rather
    /// than at load so `watch` runs without settlement configured.
    pub fn settlement_config(&self) -> Result<SettlementConfig, ConfigError> {
        if self.vault_wallet_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "settlement.vault_wallet_id",
            });
        }
        Ok(SettlementConfig {
            vault_wallet_id: WalletId::new(self.vault_wallet_id.trim()),
            token_symbol: self.token_symbol.clone(),
            max_attempts: self.max_attempts,
            backoff_step: Duration::from_millis(self.backoff_step_ms),
            confirmation_attempts: self.confirmation_attempts,
            confirmation_interval: Duration::from_millis(self.confirmation_interval_ms),
            dry_run: self.dry_run,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.token_symbol.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "settlement.token_symbol",
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "settlement.max_attempts",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.confirmation_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "settlement.confirmation_attempts",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.confirmation_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "settlement.confirmation_interval_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
