//! Uniswap v4 `StateView` pool reader.
//!
//! Reads `slot0` through the periphery `StateView` lens contract, which
//! exposes pool state keyed by pool id without touching the singleton
//! `PoolManager` storage layout.

use alloy_primitives::{Address, B256, U256};
use alloy_provider::ProviderBuilder;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::debug;

use crate::domain::chain::ChainConfig;
use crate::error::{ConfigError, PriceError, Result};
use crate::port::outbound::pool::{PoolStateReader, Slot0};

sol! {
    #[sol(rpc)]
    contract IStateView {
        function getSlot0(bytes32 poolId)
            external
            view
            returns (uint160 sqrtPriceX96, int24 tick, uint24 protocolFee, uint24 lpFee);
    }
}

/// JSON-RPC reader for one chain's `StateView` contract.
#[derive(Debug, Clone)]
pub struct StateViewReader {
    chain: String,
    rpc_url: url::Url,
    state_view: Address,
}

impl StateViewReader {
    pub fn new(chain: impl Into<String>, rpc_url: &str, state_view: Address) -> Result<Self> {
        let rpc_url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| ConfigError::InvalidValue {
                field: "rpc_url",
                reason: e.to_string(),
            })?;
        Ok(Self {
            chain: chain.into(),
            rpc_url,
            state_view,
        })
    }

    pub fn from_chain(chain: &ChainConfig) -> Result<Self> {
        Self::new(chain.name.clone(), &chain.rpc_url, chain.state_view)
    }
}

#[async_trait]
impl PoolStateReader for StateViewReader {
    async fn slot0(&self, pool_id: B256) -> Result<Slot0> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let state_view = IStateView::new(self.state_view, &provider);

        let slot0 = state_view.getSlot0(pool_id).call().await.map_err(|e| {
            PriceError::Rpc(format!("{}: getSlot0 failed: {e}", self.chain))
        })?;

        debug!(
            component = "PriceWatcher",
            chain = %self.chain,
            pool_id = %pool_id,
            sqrt_price_x96 = %slot0.sqrtPriceX96,
            "Read slot0"
        );

        Ok(Slot0 {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.low_i32(),
            protocol_fee: slot0.protocolFee.to::<u32>(),
            lp_fee: slot0.lpFee.to::<u32>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_rpc_url() {
        let result = StateViewReader::new("base", "not a url", Address::ZERO);
        assert!(matches!(
            result,
            Err(crate::error::Error::Config(ConfigError::InvalidValue { field: "rpc_url", .. }))
        ));
    }

    #[test]
    fn accepts_http_rpc_url() {
        assert!(StateViewReader::new("base", "https://sepolia.base.org", Address::ZERO).is_ok());
    }
}
