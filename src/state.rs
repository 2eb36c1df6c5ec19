use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::config::DashboardTimings;
use crate::engine::clock::Clock;
use crate::models::order::{Order, OrderChange};
use crate::models::rider::DeliveryRider;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub orders: DashMap<i64, Order>,
    pub riders: DashMap<i64, DeliveryRider>,
    pub order_changes_tx: broadcast::Sender<OrderChange>,
    pub timings: DashboardTimings,
    pub clock: Arc<dyn Clock>,
    pub metrics: Metrics,
    next_order_id: AtomicI64,
    next_rider_id: AtomicI64,
}

impl AppState {
    pub fn new(event_buffer_size: usize, timings: DashboardTimings, clock: Arc<dyn Clock>) -> Self {
        let (order_changes_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            orders: DashMap::new(),
            riders: DashMap::new(),
            order_changes_tx,
            timings,
            clock,
            metrics: Metrics::new(),
            next_order_id: AtomicI64::new(1),
            next_rider_id: AtomicI64::new(1),
        }
    }

    pub fn next_order_id(&self) -> i64 {
        self.next_order_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn next_rider_id(&self) -> i64 {
        self.next_rider_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Copies the current order set out of the store.
    pub fn order_snapshot(&self) -> Vec<Order> {
        self.orders
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn publish(&self, change: OrderChange) {
        // no subscribers just means no dashboard is open
        let _ = self.order_changes_tx.send(change);
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use crate::engine::clock::SystemClock;

        Self::new(64, DashboardTimings::default(), Arc::new(SystemClock))
    }
}
