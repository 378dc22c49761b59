//! Price watching projection types for operator-facing adapters.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::price::{PriceDiscrepancy, PriceSnapshot};
use crate::error::Result;

/// Watcher overrides from CLI flags, taking precedence over the
/// configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WatchRequest {
    /// Override for the discrepancy threshold in basis points.
    pub threshold_bps: Option<f64>,

    /// Override for the poll interval in milliseconds.
    pub poll_interval_ms: Option<u64>,
}

/// Receives every discrepancy detected while watching.
pub type DiscrepancySink = Box<dyn Fn(&PriceDiscrepancy) + Send + Sync>;

/// Resolves when watching should stop.
pub type ShutdownSignal = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Price watching use cases.
#[async_trait]
pub trait WatchOperator: Send + Sync {
    /// Poll both chains once and return the snapshot.
    async fn poll_snapshot(&self, request: &WatchRequest) -> Result<Arc<PriceSnapshot>>;

    /// Poll on the configured interval until `shutdown` resolves.
    ///
    /// Returns once the poll loop has exited.
    async fn watch(
        &self,
        request: &WatchRequest,
        sink: DiscrepancySink,
        shutdown: ShutdownSignal,
    ) -> Result<()>;
}
