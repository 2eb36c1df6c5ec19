use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};

use crate::models::queue::{AlertPulse, QueueEntry};

/// Per-dashboard record of which alerting orders staff have silenced, and since when.
///
/// Entries expire after a fixed window and are also dropped once the order leaves the
/// queue or stops alerting. Reads prune expired entries.
#[derive(Debug, Clone)]
pub struct SnoozeRegistry {
    window: TimeDelta,
    armed: HashMap<i64, NaiveDateTime>,
}

impl SnoozeRegistry {
    pub fn new(window: Duration) -> Self {
        Self {
            window: TimeDelta::from_std(window).unwrap_or(TimeDelta::weeks(1)),
            armed: HashMap::new(),
        }
    }

    /// Silences `order_id` from `at`; returns when the snooze runs out.
    pub fn snooze(&mut self, order_id: i64, at: NaiveDateTime) -> NaiveDateTime {
        self.armed.insert(order_id, at);
        at + self.window
    }

    pub fn is_snoozed(&mut self, order_id: i64, now: NaiveDateTime) -> bool {
        let Some(&armed_at) = self.armed.get(&order_id) else {
            return false;
        };

        if self.within_window(armed_at, now) {
            true
        } else {
            self.armed.remove(&order_id);
            false
        }
    }

    fn within_window(&self, armed_at: NaiveDateTime, now: NaiveDateTime) -> bool {
        now - armed_at < self.window
    }

    /// Drops expired snoozes and those whose order is gone or no longer alerting.
    pub fn prune(&mut self, queue: &[QueueEntry], now: NaiveDateTime) {
        let alerting: HashSet<i64> = queue
            .iter()
            .filter(|entry| entry.alert_level.is_alerting())
            .map(|entry| entry.order_id)
            .collect();

        let window = self.window;
        self.armed
            .retain(|order_id, armed_at| alerting.contains(order_id) && now - *armed_at < window);
    }

    /// One pulse per alerting order without a live snooze.
    pub fn due_alerts(&mut self, queue: &[QueueEntry], now: NaiveDateTime) -> Vec<AlertPulse> {
        self.prune(queue, now);

        queue
            .iter()
            .filter(|entry| entry.alert_level.is_alerting())
            .filter(|entry| !self.armed.contains_key(&entry.order_id))
            .map(|entry| AlertPulse {
                order_id: entry.order_id,
                daily_sequence: entry.daily_sequence,
                level: entry.alert_level,
                minutes_remaining: entry.countdown.minutes_remaining,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}
