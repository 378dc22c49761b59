//! Pool state port.

use alloy_primitives::{B256, U256};
use async_trait::async_trait;

use crate::error::Result;

/// Packed `slot0` of a v4 pool.
///
/// Only `sqrt_price_x96` and `tick` feed price derivation; the fee fields
/// are carried for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub protocol_fee: u32,
    pub lp_fee: u32,
}

/// Port for reading a pool's packed state on one chain.
///
/// One implementation instance serves one chain; the caller owns retry.
#[async_trait]
pub trait PoolStateReader: Send + Sync {
    /// Read `slot0` for the given pool id.
    async fn slot0(&self, pool_id: B256) -> Result<Slot0>;
}
