//! Poll loop and lifecycle of the price watcher.
//!
//! Polls the pool on two chains at a fixed interval, keeps the latest
//! [`PriceSnapshot`] and notifies subscribers when the spread between the
//! chains reaches a threshold.
//!
//! Cycles run sequentially on one task: a slow poll delays the next tick
//! instead of overlapping it. Both chains are read concurrently within a
//! cycle, and a failed cycle is logged without stopping the loop.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use super::reader::ChainPriceReader;
use super::subscription::{DiscrepancyBus, DiscrepancySubscription, SubscriptionHandle};
use crate::domain::price::{PriceDiscrepancy, PriceSnapshot};
use crate::error::Result;

const COMPONENT: &str = "PriceWatcher";

/// Poll cadence and discrepancy threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    /// Minimum spread, in basis points, that counts as a discrepancy.
    pub threshold_bps: f64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(5000),
            threshold_bps: 50.0,
        }
    }
}

/// Latest snapshot as seen by [`PriceWatcher::snapshots`].
pub type SnapshotReceiver = watch::Receiver<Option<Arc<PriceSnapshot>>>;

/// State shared between the watcher handle and its poll task.
struct PollCycle {
    chain_a: ChainPriceReader,
    chain_b: ChainPriceReader,
    threshold_bps: f64,
    snapshot_tx: watch::Sender<Option<Arc<PriceSnapshot>>>,
    bus: Arc<DiscrepancyBus>,
}

impl PollCycle {
    async fn poll(&self) -> Result<Arc<PriceSnapshot>> {
        let (price_a, price_b) = tokio::try_join!(self.chain_a.read(), self.chain_b.read())?;
        let snapshot = Arc::new(PriceSnapshot::new(price_a, price_b));

        self.snapshot_tx.send_replace(Some(Arc::clone(&snapshot)));

        info!(
            component = COMPONENT,
            chain_a = %snapshot.chain_a.chain,
            price_a = snapshot.chain_a.price,
            chain_b = %snapshot.chain_b.chain,
            price_b = snapshot.chain_b.price,
            spread_bps = snapshot.spread_bps_rounded(),
            "Price snapshot"
        );

        if let Some(discrepancy) = PriceDiscrepancy::detect(&snapshot, self.threshold_bps) {
            info!(
                component = COMPONENT,
                direction = %discrepancy.direction,
                spread_bps = snapshot.spread_bps_rounded(),
                threshold_bps = self.threshold_bps,
                "Price discrepancy detected"
            );
            self.bus.publish(&discrepancy);
        }

        Ok(snapshot)
    }

    async fn run(&self) {
        if let Err(e) = self.poll().await {
            error!(component = COMPONENT, error = %e, "Poll cycle failed");
        }
    }
}

enum WatcherState {
    Stopped,
    Running {
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<()>,
    },
}

/// Periodic two-chain price poller.
///
/// `start` and `stop` are idempotent. Dropping the watcher ends the poll
/// task after any in-flight cycle.
pub struct PriceWatcher {
    cycle: Arc<PollCycle>,
    poll_interval: Duration,
    snapshot_rx: SnapshotReceiver,
    state: Mutex<WatcherState>,
}

impl PriceWatcher {
    pub fn new(config: WatcherConfig, chain_a: ChainPriceReader, chain_b: ChainPriceReader) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let cycle = Arc::new(PollCycle {
            chain_a,
            chain_b,
            threshold_bps: config.threshold_bps,
            snapshot_tx,
            bus: Arc::new(DiscrepancyBus::default()),
        });

        Self {
            cycle,
            poll_interval: config.poll_interval,
            snapshot_rx,
            state: Mutex::new(WatcherState::Stopped),
        }
    }

    /// Begin polling. The first cycle is dispatched immediately.
    ///
    /// Must be called from within a Tokio runtime. A second call while
    /// running only logs a warning.
    pub fn start(&self) {
        let mut state = self.state.lock();
        if matches!(*state, WatcherState::Running { .. }) {
            warn!(component = COMPONENT, "Price watcher already running");
            return;
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.cycle),
            self.poll_interval,
            shutdown_rx,
        ));

        info!(
            component = COMPONENT,
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            threshold_bps = self.cycle.threshold_bps,
            "Starting price watcher"
        );

        *state = WatcherState::Running {
            shutdown: shutdown_tx,
            task,
        };
    }

    /// Stop scheduling cycles. An in-flight cycle runs to completion.
    ///
    /// No-op when already stopped.
    pub fn stop(&self) {
        if let Some((shutdown, _task)) = self.take_running() {
            let _ = shutdown.send(());
            info!(component = COMPONENT, "Stopping price watcher");
        }
    }

    /// Stop and wait for the poll task to exit.
    pub async fn shutdown(&self) {
        if let Some((shutdown, task)) = self.take_running() {
            let _ = shutdown.send(());
            info!(component = COMPONENT, "Stopping price watcher");
            if let Err(e) = task.await {
                error!(component = COMPONENT, error = %e, "Poll task ended abnormally");
            }
        }
    }

    fn take_running(&self) -> Option<(oneshot::Sender<()>, JoinHandle<()>)> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, WatcherState::Stopped) {
            WatcherState::Running { shutdown, task } => Some((shutdown, task)),
            WatcherState::Stopped => None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(*self.state.lock(), WatcherState::Running { .. })
    }

    /// Most recent successful snapshot, if any cycle has succeeded.
    #[must_use]
    pub fn latest_snapshot(&self) -> Option<Arc<PriceSnapshot>> {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that observes every snapshot replacement.
    #[must_use]
    pub fn snapshots(&self) -> SnapshotReceiver {
        self.snapshot_rx.clone()
    }

    /// Register a callback run inline for each discrepancy.
    pub fn on_discrepancy<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&PriceDiscrepancy) + Send + Sync + 'static,
    {
        self.cycle.bus.register_callback(callback)
    }

    /// Register a channel subscriber. Dropping it unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> DiscrepancySubscription {
        self.cycle.bus.register_channel()
    }

    /// Run one cycle now, returning its snapshot or error.
    ///
    /// Same effects as a scheduled cycle: the latest snapshot is replaced
    /// and subscribers are notified.
    pub async fn poll_once(&self) -> Result<Arc<PriceSnapshot>> {
        self.cycle.poll().await
    }
}

impl Drop for PriceWatcher {
    fn drop(&mut self) {
        if let Some((shutdown, _task)) = self.take_running() {
            let _ = shutdown.send(());
        }
    }
}

async fn poll_loop(
    cycle: Arc<PollCycle>,
    poll_interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = interval(poll_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }
        // Outside the select so a stop request never cancels a cycle midway.
        cycle.run().await;
    }

    info!(component = COMPONENT, "Price watcher stopped");
}
