//! Price watcher and chain configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::retry::RetryOptions;
use crate::application::watcher::service::WatcherConfig;
use crate::domain::sqrt_price::MAX_DECIMAL_GAP;
use crate::domain::chain::ChainConfig;
use crate::error::ConfigError;

/// `[watcher]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_threshold_bps")]
    pub threshold_bps: f64,
    /// Per-chain pool read retry.
    #[serde(default)]
    pub retry: RetryOptions,
}

const fn default_poll_interval_ms() -> u64 {
    5000
}

const fn default_threshold_bps() -> f64 {
    50.0
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            threshold_bps: default_threshold_bps(),
            retry: RetryOptions::default(),
        }
    }
}

impl WatcherSettings {
    #[must_use]
    pub fn watcher_config(&self) -> WatcherConfig {
        WatcherConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            threshold_bps: self.threshold_bps,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "watcher.poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        if !self.threshold_bps.is_finite() || self.threshold_bps < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "watcher.threshold_bps",
                reason: format!("must be 0 or greater, got {}", self.threshold_bps),
            });
        }
        self.retry.validate("watcher.retry")
    }
}

/// `[chains.a]` and `[chains.b]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainsConfig {
    pub a: ChainConfig,
    pub b: ChainConfig,
}

impl ChainsConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_chain(&self.a, ChainFields::A)?;
        validate_chain(&self.b, ChainFields::B)
    }
}

/// Field labels per chain slot; `ConfigError` takes static names.
struct ChainFields {
    rpc_url: &'static str,
    tokens: &'static str,
    decimals: &'static str,
}

impl ChainFields {
    const A: Self = Self {
        rpc_url: "chains.a.rpc_url",
        tokens: "chains.a.quote_token",
        decimals: "chains.a.decimals",
    };
    const B: Self = Self {
        rpc_url: "chains.b.rpc_url",
        tokens: "chains.b.quote_token",
        decimals: "chains.b.decimals",
    };
}

fn validate_chain(chain: &ChainConfig, fields: ChainFields) -> Result<(), ConfigError> {
    if chain.rpc_url.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: fields.rpc_url,
        });
    }
    if chain.base_token.address == chain.quote_token.address {
        return Err(ConfigError::InvalidValue {
            field: fields.tokens,
            reason: format!(
                "{}: base and quote token share address {}",
                chain.name, chain.base_token.address
            ),
        });
    }
    let base = u32::from(chain.base_token.decimals);
    let quote = u32::from(chain.quote_token.decimals);
    if base > MAX_DECIMAL_GAP || quote > MAX_DECIMAL_GAP {
        return Err(ConfigError::InvalidValue {
            field: fields.decimals,
            reason: format!("{}: token decimals must be at most {MAX_DECIMAL_GAP}", chain.name),
        });
    }
    Ok(())
}
