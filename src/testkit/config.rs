//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.
//! Avoids each test module defining its own slightly-different defaults.

use std::time::Duration;

use crate::application::retry::RetryOptions;
use crate::application::settlement::orchestrator::SettlementConfig;
use crate::application::watcher::service::WatcherConfig;
use crate::domain::id::WalletId;

/// Retry options with short delays: 10ms, 20ms, 40ms.
pub fn fast_retry(max_retries: u32) -> RetryOptions {
    RetryOptions {
        max_retries,
        base_delay_ms: 10,
        max_delay_ms: 40,
        backoff_multiplier: 2.0,
    }
}

/// Single attempt, no retry.
pub fn no_retry() -> RetryOptions {
    fast_retry(0)
}

/// Watcher polling every `poll_ms` with the given threshold.
pub fn watcher(poll_ms: u64, threshold_bps: f64) -> WatcherConfig {
    WatcherConfig {
        poll_interval: Duration::from_millis(poll_ms),
        threshold_bps,
    }
}

/// Settlement into `vault` with production retry shape but short
/// confirmation polling (3 attempts, 100ms apart).
///
/// Backoff between attempts stays at 2000ms × n; pair with paused time.
pub fn settlement(vault: &str) -> SettlementConfig {
    SettlementConfig {
        confirmation_attempts: 3,
        confirmation_interval: Duration::from_millis(100),
        ..SettlementConfig::new(WalletId::from(vault))
    }
}
