use std::sync::Arc;

use spreadvault::application::retry::RetryOptions;
use spreadvault::application::watcher::reader::ChainPriceReader;
use spreadvault::application::watcher::service::{PriceWatcher, WatcherConfig};
use spreadvault::testkit::domain::chain;
use spreadvault::testkit::pool::ScriptedPool;

/// Watcher over two scripted pools. Chain A has base as token0, chain B
/// has base as token1, so both derivation paths are exercised.
pub fn watcher(
    pool_a: &Arc<ScriptedPool>,
    pool_b: &Arc<ScriptedPool>,
    config: WatcherConfig,
    retry: RetryOptions,
) -> PriceWatcher {
    let reader_a = ChainPriceReader::with_retry(chain("chain-a", true), pool_a.clone(), retry);
    let reader_b = ChainPriceReader::with_retry(chain("chain-b", false), pool_b.clone(), retry);
    PriceWatcher::new(config, reader_a, reader_b)
}
