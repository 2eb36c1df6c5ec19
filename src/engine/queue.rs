use chrono::NaiveDateTime;
use tracing::warn;

use crate::engine::alert::classify_alert;
use crate::engine::countdown::{compute_countdown, delivery_instant};
use crate::engine::sequence::daily_sequences;
use crate::error::AppError;
use crate::models::order::Order;
use crate::models::queue::{AlertLevel, NextOrderInfo, QueueEntry, QueueLineItem};
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct QueueProjection {
    pub entries: Vec<QueueEntry>,
    /// Active orders left out because they could not be enriched.
    pub skipped: usize,
}

/// Builds the active queue: queued statuses with a delivery slot, earliest delivery first.
///
/// An order that fails enrichment is logged and left out; it never hides the rest of
/// the queue.
pub fn project_queue(orders: &[Order], now: NaiveDateTime) -> QueueProjection {
    let sequences = daily_sequences(orders);
    let mut projection = QueueProjection::default();

    for order in orders.iter().filter(|order| is_active(order)) {
        let daily_sequence = sequences.get(&order.id).copied().unwrap_or(1);
        match enrich(order, daily_sequence, now) {
            Ok(entry) => projection.entries.push(entry),
            Err(err) => {
                warn!(order_id = order.id, error = %err, "skipping order in queue projection");
                projection.skipped += 1;
            }
        }
    }

    projection
        .entries
        .sort_by_key(|entry| (entry.countdown.delivery_at, entry.order_id));
    projection
}

fn is_active(order: &Order) -> bool {
    order.status.is_queued() && order.delivery_date.is_some() && order.delivery_time.is_some()
}

pub fn enrich(order: &Order, daily_sequence: u32, now: NaiveDateTime) -> Result<QueueEntry, AppError> {
    let (Some(date), Some(time)) = (order.delivery_date, order.delivery_time) else {
        return Err(AppError::Validation(format!(
            "order {} has no delivery date and time",
            order.id
        )));
    };

    let line_items = order
        .line_items
        .iter()
        .map(|item| {
            if item.quantity == 0 {
                return Err(AppError::Validation("line item quantity must be > 0".to_string()));
            }
            Ok(QueueLineItem {
                name: item.display_name()?.to_string(),
                is_custom: item.is_custom,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let countdown = compute_countdown(delivery_instant(date, time), now);
    let alert_level = classify_alert(countdown.minutes_remaining);

    Ok(QueueEntry {
        order_id: order.id,
        daily_sequence,
        status: order.status,
        countdown,
        alert_level,
        total_amount: order.total_amount,
        customer_name: order.customer_name.clone(),
        customer_phone: order.customer_phone.clone(),
        customer_address: order.customer_address.clone(),
        customer_postcode: order.customer_postcode.clone(),
        city: order.city.clone(),
        rider: order.rider.clone(),
        line_items,
    })
}

/// Re-evaluates countdowns and alert levels of an existing projection against `now`.
pub fn recompute_countdowns(entries: &mut [QueueEntry], now: NaiveDateTime) {
    for entry in entries {
        entry.countdown = compute_countdown(entry.countdown.delivery_at, now);
        entry.alert_level = classify_alert(entry.countdown.minutes_remaining);
    }
}

pub fn next_order_info(entries: &[QueueEntry]) -> Option<NextOrderInfo> {
    let head = entries.first()?;
    let count = |level: AlertLevel| entries.iter().filter(|e| e.alert_level == level).count();

    Some(NextOrderInfo {
        entry: head.clone(),
        queue_length: entries.len(),
        critical_count: count(AlertLevel::Critical),
        warning_count: count(AlertLevel::Warning),
    })
}

/// Projects the queue over the current store contents.
pub fn list_active_queue(state: &AppState, now: NaiveDateTime) -> Vec<QueueEntry> {
    let orders = state.order_snapshot();
    let projection = project_queue(&orders, now);

    state
        .metrics
        .projection_skipped_total
        .inc_by(projection.skipped as u64);
    state
        .metrics
        .active_queue_size
        .set(projection.entries.len() as i64);

    projection.entries
}
