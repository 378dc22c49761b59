//! Mock [`PoolStateReader`] for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{PriceError, Result};
use crate::port::outbound::pool::{PoolStateReader, Slot0};

/// `sqrtPriceX96` a pool holds for `price` quote units per base token.
///
/// Float math, accurate to roughly 1e-12 relative; enough for tests that
/// compare derived prices with a tolerance.
pub fn sqrt_price_for(price: f64, base_is_token0: bool, base_decimals: u8, quote_decimals: u8) -> U256 {
    let gap = i32::from(base_decimals) - i32::from(quote_decimals);
    let raw_ratio = if base_is_token0 {
        price * 10f64.powi(-gap)
    } else {
        10f64.powi(gap) / price
    };
    U256::from((raw_ratio.sqrt() * 2f64.powi(96)) as u128)
}

/// `slot0` for an 18/6 decimal pair at `price`.
pub fn slot0_at(price: f64, base_is_token0: bool) -> Slot0 {
    Slot0 {
        sqrt_price_x96: sqrt_price_for(price, base_is_token0, 18, 6),
        tick: 0,
        protocol_fee: 0,
        lp_fee: 3000,
    }
}

/// `slot0` of a pool that was never initialized.
pub fn uninitialized_slot0() -> Slot0 {
    Slot0 {
        sqrt_price_x96: U256::ZERO,
        tick: 0,
        protocol_fee: 0,
        lp_fee: 0,
    }
}

/// A pool reader with scripted results.
///
/// Each `slot0()` call pops the next queued result. Once the queue is
/// empty the current fallback is returned, or an RPC error when none is
/// set. An optional delay simulates RPC latency.
pub struct ScriptedPool {
    results: Mutex<VecDeque<Result<Slot0>>>,
    fallback: Mutex<Option<Slot0>>,
    delay: Duration,
    calls: Arc<AtomicU32>,
    in_flight: AtomicU32,
    max_in_flight: Arc<AtomicU32>,
}

impl Default for ScriptedPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPool {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicU32::new(0)),
            in_flight: AtomicU32::new(0),
            max_in_flight: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Always answer with `slot0`.
    pub fn fixed(slot0: Slot0) -> Self {
        let pool = Self::new();
        pool.set_fallback(slot0);
        pool
    }

    /// Always answer with the slot0 for `price` (18/6 decimals).
    pub fn at_price(price: f64, base_is_token0: bool) -> Self {
        Self::fixed(slot0_at(price, base_is_token0))
    }

    pub fn with_results(self, results: Vec<Result<Slot0>>) -> Self {
        *self.results.lock() = results.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue `n` RPC failures ahead of any other results.
    pub fn failing_first(self, n: usize) -> Self {
        {
            let mut results = self.results.lock();
            for i in 0..n {
                results.push_front(Err(PriceError::Rpc(format!("scripted failure {}", n - i)).into()));
            }
        }
        self
    }

    /// Replace the answer returned once the queue is drained.
    pub fn set_fallback(&self, slot0: Slot0) {
        *self.fallback.lock() = Some(slot0);
    }

    /// Make every later call fail once the queue is drained.
    pub fn clear_fallback(&self) {
        *self.fallback.lock() = None;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared call counter.
    pub fn call_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }

    /// Highest number of overlapping `slot0()` calls observed.
    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoolStateReader for ScriptedPool {
    async fn slot0(&self, _pool_id: B256) -> Result<Slot0> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let queued = self.results.lock().pop_front();
        let result = match queued {
            Some(result) => result,
            None => match *self.fallback.lock() {
                Some(slot0) => Ok(slot0),
                None => Err(PriceError::Rpc("no scripted result".into()).into()),
            },
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
