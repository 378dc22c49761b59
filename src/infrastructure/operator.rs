//! Operator implementation backing the inbound adapters.
//!
//! Applies per-invocation overrides on top of the loaded [`Config`] and
//! wires fresh services for each use case through [`super::bootstrap`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::bootstrap::{build_auto_settler, build_price_watcher};
use crate::adapter::outbound::session::manual::ManualSessionSource;
use crate::application::settlement::orchestrator::SettleOptions;
use crate::application::watcher::service::PriceWatcher;
use crate::domain::price::PriceSnapshot;
use crate::domain::settlement::SettlementRecord;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::settle::{SettleRequest, SettlementOperator};
use crate::port::inbound::operator::watch::{
    DiscrepancySink, ShutdownSignal, WatchOperator, WatchRequest,
};

/// Operator over one loaded configuration.
pub struct Operator {
    config: Config,
}

impl Operator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn watcher(&self, request: &WatchRequest) -> Result<PriceWatcher> {
        let mut config = self.config.clone();
        apply_watch_overrides(&mut config, request)?;
        build_price_watcher(&config)
    }
}

/// Apply watch overrides to the watcher settings.
pub fn apply_watch_overrides(config: &mut Config, request: &WatchRequest) -> Result<()> {
    if let Some(threshold) = request.threshold_bps {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "threshold_bps",
                reason: format!("must be 0 or greater, got {threshold}"),
            }
            .into());
        }
        config.watcher.threshold_bps = threshold;
    }
    if let Some(interval) = request.poll_interval_ms {
        if interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        config.watcher.poll_interval_ms = interval;
    }
    Ok(())
}

#[async_trait]
impl WatchOperator for Operator {
    async fn poll_snapshot(&self, request: &WatchRequest) -> Result<Arc<PriceSnapshot>> {
        self.watcher(request)?.poll_once().await
    }

    async fn watch(
        &self,
        request: &WatchRequest,
        sink: DiscrepancySink,
        shutdown: ShutdownSignal,
    ) -> Result<()> {
        let watcher = self.watcher(request)?;
        let _sink = watcher.on_discrepancy(move |discrepancy| sink(discrepancy));

        watcher.start();
        shutdown.await;
        info!(component = "PriceWatcher", "Shutdown signal received");
        watcher.shutdown().await;
        Ok(())
    }
}

#[async_trait]
impl SettlementOperator for Operator {
    async fn settle(&self, request: SettleRequest) -> Result<SettlementRecord> {
        let mut config = self.config.clone();
        if request.dry_run {
            config.settlement.dry_run = true;
        }

        let session_id = request.session.session_id.clone();
        let sessions = Arc::new(ManualSessionSource::with_result(request.session));
        let settler = build_auto_settler(&config, sessions)?;

        let options = SettleOptions {
            amount_override: request.amount_override,
        };
        Ok(settler.settle_session(&session_id, options).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settlement::orchestrator::NO_PROFIT;
    use crate::domain::settlement::SessionStatus;
    use crate::error::Error;
    use crate::testkit::domain::session;
    use crate::testkit::keys::ENTITY_SECRET_HEX;
    use rust_decimal_macros::dec;

    const CONFIG: &str = r#"
[chains.a]
name = "a"
chain_id = 1
rpc_url = "http://localhost:8545"
pool_id = "0x1111111111111111111111111111111111111111111111111111111111111111"
state_view = "0x4444444444444444444444444444444444444444"
base_token = { address = "0x1111111111111111111111111111111111111111", decimals = 18 }
quote_token = { address = "0x2222222222222222222222222222222222222222", decimals = 6 }

[chains.b]
name = "b"
chain_id = 2
rpc_url = "http://localhost:8546"
pool_id = "0x2222222222222222222222222222222222222222222222222222222222222222"
state_view = "0x4444444444444444444444444444444444444444"
base_token = { address = "0x1111111111111111111111111111111111111111", decimals = 18 }
quote_token = { address = "0x2222222222222222222222222222222222222222", decimals = 6 }

[ledger]
api_url = "http://127.0.0.1:9"
source_wallet_id = "source"

[settlement]
vault_wallet_id = "vault"
"#;

    fn config() -> Config {
        Config::parse_toml_with_env(CONFIG, |key| match key {
            "LEDGER_API_KEY" => Some("test-key".into()),
            "ENTITY_SECRET_HEX" => Some(ENTITY_SECRET_HEX.into()),
            _ => None,
        })
        .unwrap()
    }

    fn request(threshold_bps: Option<f64>, poll_interval_ms: Option<u64>) -> WatchRequest {
        WatchRequest {
            threshold_bps,
            poll_interval_ms,
        }
    }

    fn settle_request(status: SessionStatus, profit: rust_decimal::Decimal) -> SettleRequest {
        SettleRequest {
            session: session("s-1", status, profit),
            amount_override: None,
            dry_run: false,
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut cfg = config();
        apply_watch_overrides(&mut cfg, &request(Some(12.5), Some(250))).unwrap();
        assert!((cfg.watcher.threshold_bps - 12.5).abs() < f64::EPSILON);
        assert_eq!(cfg.watcher.poll_interval_ms, 250);
    }

    #[test]
    fn negative_threshold_override_is_rejected() {
        let mut cfg = config();
        let result = apply_watch_overrides(&mut cfg, &request(Some(-1.0), None));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "threshold_bps",
                ..
            }))
        ));
        assert!((cfg.watcher.threshold_bps - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_interval_override_is_rejected() {
        let mut cfg = config();
        assert!(apply_watch_overrides(&mut cfg, &request(None, Some(0))).is_err());
    }

    #[tokio::test]
    async fn settle_without_profit_makes_no_ledger_calls() {
        let operator = Operator::new(config());
        let record = operator
            .settle(settle_request(SessionStatus::Completed, dec!(0)))
            .await
            .unwrap();
        assert!(!record.settled);
        assert_eq!(record.error.as_deref(), Some(NO_PROFIT));
    }

    #[tokio::test]
    async fn settle_skips_unfinished_session() {
        let operator = Operator::new(config());
        let record = operator
            .settle(settle_request(SessionStatus::Cancelled, dec!(5)))
            .await
            .unwrap();
        assert_eq!(record.error.as_deref(), Some("Session status: CANCELLED"));
    }

    #[tokio::test]
    async fn settle_requires_vault_wallet() {
        let mut cfg = config();
        cfg.settlement.vault_wallet_id = String::new();
        let operator = Operator::new(cfg);
        let result = operator
            .settle(settle_request(SessionStatus::Completed, dec!(5)))
            .await;
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField {
                field: "settlement.vault_wallet_id"
            }))
        ));
    }

    #[cfg(feature = "evm")]
    #[tokio::test]
    async fn watch_returns_once_shutdown_resolves() {
        let operator = Operator::new(config());
        let result = operator
            .watch(
                &WatchRequest::default(),
                Box::new(|_: &crate::domain::price::PriceDiscrepancy| {}),
                Box::pin(async {}),
            )
            .await;
        assert!(result.is_ok());
    }
}
