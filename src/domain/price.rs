//! Price readings, snapshots and discrepancies.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Basis points in one whole.
const BPS: f64 = 10_000.0;

/// A point-in-time price reading from one chain's pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainPrice {
    /// Chain key the reading came from.
    pub chain: String,
    /// Raw Q64.96 square-root price as stored by the pool.
    pub sqrt_price_x96: U256,
    /// Current pool tick.
    pub tick: i32,
    /// Quote-token units per base token.
    pub price: f64,
    /// When the reading was taken.
    pub captured_at: DateTime<Utc>,
}

/// Relative spread between two prices in basis points.
///
/// `|a - b| / avg(a, b) * 10000`, or 0 when the average is not positive.
#[must_use]
pub fn spread_bps(price_a: f64, price_b: f64) -> f64 {
    let avg = (price_a + price_b) / 2.0;
    if avg > 0.0 {
        (price_a - price_b).abs() / avg * BPS
    } else {
        0.0
    }
}

/// Which chain currently offers the cheaper price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Chain A is cheaper: buy on A, sell on B.
    ACheaper,
    /// Chain B is cheaper (or equal): buy on B, sell on A.
    BCheaper,
}

impl Direction {
    /// Direction for a pair of prices; ties resolve to [`Direction::BCheaper`].
    #[must_use]
    pub fn between(price_a: f64, price_b: f64) -> Self {
        if price_a < price_b {
            Self::ACheaper
        } else {
            Self::BCheaper
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ACheaper => write!(f, "A_CHEAPER"),
            Self::BCheaper => write!(f, "B_CHEAPER"),
        }
    }
}

/// Both chains' readings from one poll cycle plus the spread between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSnapshot {
    pub chain_a: ChainPrice,
    pub chain_b: ChainPrice,
    pub spread_bps: f64,
}

impl PriceSnapshot {
    /// Build a snapshot, computing the spread from the two readings.
    #[must_use]
    pub fn new(chain_a: ChainPrice, chain_b: ChainPrice) -> Self {
        let spread_bps = spread_bps(chain_a.price, chain_b.price);
        Self {
            chain_a,
            chain_b,
            spread_bps,
        }
    }

    /// Which chain is cheaper in this snapshot.
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::between(self.chain_a.price, self.chain_b.price)
    }

    /// Spread rounded to two decimals, for log output.
    #[must_use]
    pub fn spread_bps_rounded(&self) -> f64 {
        (self.spread_bps * 100.0).round() / 100.0
    }
}

/// A snapshot whose spread reached the configured threshold.
///
/// Transient: delivered to subscribers and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceDiscrepancy {
    pub snapshot: Arc<PriceSnapshot>,
    pub direction: Direction,
    pub detected_at: DateTime<Utc>,
}

impl PriceDiscrepancy {
    /// Return a discrepancy when `snapshot.spread_bps >= threshold_bps`.
    #[must_use]
    pub fn detect(snapshot: &Arc<PriceSnapshot>, threshold_bps: f64) -> Option<Self> {
        if snapshot.spread_bps < threshold_bps {
            return None;
        }
        Some(Self {
            snapshot: Arc::clone(snapshot),
            direction: snapshot.direction(),
            detected_at: Utc::now(),
        })
    }
}
