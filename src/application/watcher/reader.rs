//! Per-chain price reader.

use std::sync::Arc;

use chrono::Utc;

use crate::application::retry::{RetryExecutor, RetryOptions};
use crate::domain::chain::ChainConfig;
use crate::domain::price::ChainPrice;
use crate::domain::sqrt_price::sqrt_price_x96_to_price;
use crate::error::{PriceError, Result};
use crate::port::outbound::pool::PoolStateReader;

/// Reads one chain's pool and derives the base-in-quote price.
pub struct ChainPriceReader {
    chain: ChainConfig,
    pool: Arc<dyn PoolStateReader>,
    retry: RetryExecutor,
}

impl ChainPriceReader {
    pub fn new(chain: ChainConfig, pool: Arc<dyn PoolStateReader>) -> Self {
        Self::with_retry(chain, pool, RetryOptions::default())
    }

    pub fn with_retry(
        chain: ChainConfig,
        pool: Arc<dyn PoolStateReader>,
        options: RetryOptions,
    ) -> Self {
        let retry = RetryExecutor::new(options, format!("PriceWatcher:{}", chain.name));
        Self { chain, pool, retry }
    }

    #[must_use]
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Read `slot0` under the retry budget and convert it to a price.
    ///
    /// A zero `sqrtPriceX96` means the pool was never initialized; that is
    /// reported without retrying since another read will not change it.
    pub async fn read(&self) -> Result<ChainPrice> {
        let pool_id = self.chain.pool_id;
        let slot0 = self.retry.run(|| self.pool.slot0(pool_id)).await?;

        if slot0.sqrt_price_x96.is_zero() {
            return Err(PriceError::UninitializedPool {
                chain: self.chain.name.clone(),
            }
            .into());
        }

        let price = sqrt_price_x96_to_price(
            slot0.sqrt_price_x96,
            self.chain.base_is_token0(),
            self.chain.base_token.decimals,
            self.chain.quote_token.decimals,
        )?;

        Ok(ChainPrice {
            chain: self.chain.name.clone(),
            sqrt_price_x96: slot0.sqrt_price_x96,
            tick: slot0.tick,
            price,
            captured_at: Utc::now(),
        })
    }
}
