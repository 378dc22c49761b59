//! Discrepancy subscriber registry.
//!
//! Subscribers are either callbacks run inline during the poll cycle or
//! unbounded channels drained by the subscriber. Delivery follows
//! registration order for both kinds.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::domain::price::PriceDiscrepancy;

type Callback = Arc<dyn Fn(&PriceDiscrepancy) + Send + Sync>;

#[derive(Clone)]
enum Sink {
    Callback(Callback),
    Channel(mpsc::UnboundedSender<PriceDiscrepancy>),
}

struct Entry {
    id: u64,
    sink: Sink,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Ordered fan-out of discrepancies to registered subscribers.
#[derive(Default)]
pub(crate) struct DiscrepancyBus {
    registry: Mutex<Registry>,
}

impl DiscrepancyBus {
    fn add(&self, sink: Sink) -> u64 {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry { id, sink });
        id
    }

    fn remove(&self, id: u64) {
        self.registry.lock().entries.retain(|entry| entry.id != id);
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.registry.lock().entries.len()
    }

    pub(crate) fn register_callback<F>(self: &Arc<Self>, callback: F) -> SubscriptionHandle
    where
        F: Fn(&PriceDiscrepancy) + Send + Sync + 'static,
    {
        let id = self.add(Sink::Callback(Arc::new(callback)));
        SubscriptionHandle {
            id,
            bus: Arc::downgrade(self),
        }
    }

    pub(crate) fn register_channel(self: &Arc<Self>) -> DiscrepancySubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.add(Sink::Channel(tx));
        DiscrepancySubscription {
            id,
            rx,
            bus: Arc::downgrade(self),
        }
    }

    /// Deliver to every subscriber in registration order.
    ///
    /// Sinks are invoked outside the registry lock so a callback may
    /// subscribe or cancel. A panicking callback is logged and skipped.
    /// Returns the number of subscribers reached.
    pub(crate) fn publish(&self, discrepancy: &PriceDiscrepancy) -> usize {
        let sinks: Vec<(u64, Sink)> = self
            .registry
            .lock()
            .entries
            .iter()
            .map(|entry| (entry.id, entry.sink.clone()))
            .collect();

        let mut delivered = 0;
        for (id, sink) in sinks {
            match sink {
                Sink::Callback(callback) => {
                    let outcome = catch_unwind(AssertUnwindSafe(|| callback(discrepancy)));
                    if outcome.is_err() {
                        error!(
                            component = "PriceWatcher",
                            subscriber = id,
                            "Discrepancy subscriber panicked"
                        );
                    } else {
                        delivered += 1;
                    }
                }
                Sink::Channel(tx) => {
                    if tx.send(discrepancy.clone()).is_ok() {
                        delivered += 1;
                    } else {
                        debug!(component = "PriceWatcher", subscriber = id, "Dropping closed subscriber");
                        self.remove(id);
                    }
                }
            }
        }
        delivered
    }
}

/// Handle for a callback subscription.
///
/// Dropping the handle leaves the callback registered; call
/// [`SubscriptionHandle::cancel`] to remove it.
#[must_use = "keep the handle to cancel the subscription later"]
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: u64,
    bus: Weak<DiscrepancyBus>,
}

impl SubscriptionHandle {
    /// Stop delivering to this callback. Later cycles skip it.
    pub fn cancel(self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

/// Channel subscription; cancelled on drop.
#[derive(Debug)]
pub struct DiscrepancySubscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<PriceDiscrepancy>,
    bus: Weak<DiscrepancyBus>,
}

impl DiscrepancySubscription {
    /// Wait for the next discrepancy. `None` once the watcher is gone.
    pub async fn recv(&mut self) -> Option<PriceDiscrepancy> {
        self.rx.recv().await
    }

    /// Take a queued discrepancy without waiting.
    pub fn try_recv(&mut self) -> Option<PriceDiscrepancy> {
        self.rx.try_recv().ok()
    }

    /// Unregister now. Same as dropping the subscription.
    pub fn cancel(self) {}
}

impl Drop for DiscrepancySubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

impl std::fmt::Debug for DiscrepancyBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscrepancyBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::{ChainPrice, Direction, PriceSnapshot};
    use alloy_primitives::U256;
    use chrono::Utc;

    fn discrepancy() -> PriceDiscrepancy {
        let reading = |chain: &str, price: f64| ChainPrice {
            chain: chain.into(),
            sqrt_price_x96: U256::from(1u8) << 96,
            tick: 0,
            price,
            captured_at: Utc::now(),
        };
        let snapshot = Arc::new(PriceSnapshot::new(reading("a", 1.0), reading("b", 1.02)));
        PriceDiscrepancy::detect(&snapshot, 0.0).unwrap()
    }

    #[test]
    fn delivers_in_registration_order() {
        let bus = Arc::new(DiscrepancyBus::default());
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            let _handle = bus.register_callback(move |_| order.lock().push(label));
        }

        assert_eq!(bus.publish(&discrepancy()), 3);
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn cancelled_callback_is_skipped() {
        let bus = Arc::new(DiscrepancyBus::default());
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let handle = bus.register_callback(move |_| *counter.lock() += 1);

        bus.publish(&discrepancy());
        handle.cancel();
        bus.publish(&discrepancy());

        assert_eq!(*hits.lock(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn panicking_callback_does_not_block_later_subscribers() {
        let bus = Arc::new(DiscrepancyBus::default());
        let reached = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&reached);

        let _bad = bus.register_callback(|_| panic!("subscriber bug"));
        let _good = bus.register_callback(move |_| *flag.lock() = true);

        assert_eq!(bus.publish(&discrepancy()), 1);
        assert!(*reached.lock());
    }

    #[test]
    fn channel_subscription_receives_and_unregisters_on_drop() {
        let bus = Arc::new(DiscrepancyBus::default());
        let mut sub = bus.register_channel();

        bus.publish(&discrepancy());
        let received = sub.try_recv().unwrap();
        assert_eq!(received.direction, Direction::ACheaper);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn callback_may_cancel_itself_during_delivery() {
        let bus = Arc::new(DiscrepancyBus::default());
        let slot: Arc<Mutex<Option<SubscriptionHandle>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);

        let handle = bus.register_callback(move |_| {
            if let Some(handle) = inner.lock().take() {
                handle.cancel();
            }
        });
        *slot.lock() = Some(handle);

        bus.publish(&discrepancy());
        assert_eq!(bus.subscriber_count(), 0);
    }
}
