//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

#[cfg(feature = "evm")]
use crate::adapter::outbound::evm::state_view::StateViewReader;
use crate::adapter::outbound::ledger::client::CircleLedgerClient;
use crate::application::settlement::auto::AutoSettler;
use crate::application::settlement::orchestrator::SettlementOrchestrator;
#[cfg(feature = "evm")]
use crate::application::watcher::reader::ChainPriceReader;
use crate::application::watcher::service::PriceWatcher;
#[cfg(feature = "evm")]
use crate::domain::chain::ChainConfig;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::ledger::WalletLedger;
use crate::port::outbound::session::SessionResultSource;

/// Build a price watcher reading both configured chains over JSON-RPC.
#[cfg(feature = "evm")]
pub fn build_price_watcher(config: &Config) -> Result<PriceWatcher> {
    let chain_a = build_chain_reader(config, &config.chains.a)?;
    let chain_b = build_chain_reader(config, &config.chains.b)?;
    Ok(PriceWatcher::new(
        config.watcher.watcher_config(),
        chain_a,
        chain_b,
    ))
}

/// Without the `evm` feature there is no pool reader to build.
#[cfg(not(feature = "evm"))]
pub fn build_price_watcher(_config: &Config) -> Result<PriceWatcher> {
    Err(crate::error::ConfigError::InvalidValue {
        field: "features",
        reason: "price watching requires the `evm` feature".to_string(),
    }
    .into())
}

#[cfg(feature = "evm")]
fn build_chain_reader(config: &Config, chain: &ChainConfig) -> Result<ChainPriceReader> {
    let pool = Arc::new(StateViewReader::from_chain(chain)?);
    info!(
        component = "PriceWatcher",
        chain = %chain.name,
        chain_id = chain.chain_id,
        pool_id = %chain.pool_id,
        "Configured chain"
    );
    Ok(ChainPriceReader::with_retry(
        chain.clone(),
        pool,
        config.watcher.retry,
    ))
}

/// Build the ledger client from configuration and environment secrets.
pub fn build_ledger(config: &Config) -> Result<Arc<dyn WalletLedger>> {
    let ledger = CircleLedgerClient::new(&config.ledger)?;
    info!(
        component = "CircleLedger",
        api_url = %config.ledger.api_url,
        source_wallet_id = %ledger.source_wallet_id(),
        "Ledger client ready"
    );
    Ok(Arc::new(ledger))
}

/// Build the settlement pipeline over the given session source.
pub fn build_auto_settler(
    config: &Config,
    sessions: Arc<dyn SessionResultSource>,
) -> Result<AutoSettler> {
    let settlement = config.settlement.settlement_config()?;
    let ledger = build_ledger(config)?;
    Ok(AutoSettler::new(
        sessions,
        SettlementOrchestrator::new(ledger, settlement),
    ))
}
