use prometheus::IntCounterVec;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::order::{Order, OrderChange, OrderChangeKind, OrderStatus};
use crate::models::rider::RiderRef;
use crate::state::AppState;

/// Sets an order's status. Any status may follow any other; only the value set is closed.
pub fn update_order_status(
    state: &AppState,
    order_id: i64,
    raw_status: &str,
) -> Result<Order, AppError> {
    let outcome = apply_status(state, order_id, raw_status);
    record_outcome(&state.metrics.status_updates_total, &outcome);

    match &outcome {
        Ok(order) => {
            info!(order_id, status = %order.status, "order status updated");
            state.publish(OrderChange {
                order_id,
                kind: OrderChangeKind::Status,
            });
        }
        Err(err) => warn!(order_id, error = %err, "order status update rejected"),
    }

    outcome
}

fn apply_status(state: &AppState, order_id: i64, raw_status: &str) -> Result<Order, AppError> {
    let status: OrderStatus = raw_status.parse()?;

    let mut order = state
        .orders
        .get_mut(&order_id)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

    order.status = status;
    Ok(order.clone())
}

/// Assigns `rider_id` to the order, replacing any previous rider; `None` clears it.
///
/// The order is untouched unless both the order and an active rider resolve.
pub fn assign_rider(
    state: &AppState,
    order_id: i64,
    rider_id: Option<i64>,
) -> Result<Order, AppError> {
    let outcome = apply_rider(state, order_id, rider_id);
    record_outcome(&state.metrics.rider_assignments_total, &outcome);

    match &outcome {
        Ok(_) => {
            info!(order_id, rider_id, "rider assignment updated");
            state.publish(OrderChange {
                order_id,
                kind: OrderChangeKind::Rider,
            });
        }
        Err(err) => warn!(order_id, rider_id, error = %err, "rider assignment rejected"),
    }

    outcome
}

fn apply_rider(state: &AppState, order_id: i64, rider_id: Option<i64>) -> Result<Order, AppError> {
    let rider = match rider_id {
        Some(rider_id) => Some(resolve_rider(state, rider_id)?),
        None => None,
    };

    let mut order = state
        .orders
        .get_mut(&order_id)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

    order.rider = rider;
    Ok(order.clone())
}

fn resolve_rider(state: &AppState, rider_id: i64) -> Result<RiderRef, AppError> {
    let rider = state
        .riders
        .get(&rider_id)
        .ok_or_else(|| AppError::NotFound(format!("rider {rider_id} not found")))?;

    if !rider.is_active {
        return Err(AppError::Validation(format!("rider {rider_id} is inactive")));
    }

    Ok(RiderRef::from(rider.value()))
}

fn record_outcome<T>(counter: &IntCounterVec, outcome: &Result<T, AppError>) {
    let label = match outcome {
        Ok(_) => "success",
        Err(AppError::NotFound(_)) => "not_found",
        Err(AppError::Validation(_)) => "invalid",
        Err(_) => "error",
    };
    counter.with_label_values(&[label]).inc();
}

#[cfg(test)]
mod tests {
    use super::{assign_rider, update_order_status};
    use crate::error::AppError;
    use crate::models::fixtures::scheduled;
    use crate::models::order::{OrderChangeKind, OrderStatus};
    use crate::models::rider::{DeliveryRider, RiderRef};
    use crate::state::AppState;

    fn state_with_order() -> AppState {
        let state = AppState::for_tests();
        state
            .orders
            .insert(1, scheduled(1, "2024-01-10T08:00:00", "2024-01-10", "12:00"));
        state.riders.insert(
            10,
            DeliveryRider {
                id: 10,
                name: "Tunde".to_string(),
                phone: "07700 900456".to_string(),
                is_active: true,
            },
        );
        state.riders.insert(
            11,
            DeliveryRider {
                id: 11,
                name: "Kemi".to_string(),
                phone: "07700 900789".to_string(),
                is_active: true,
            },
        );
        state
    }

    #[test]
    fn any_status_may_follow_any_other() {
        let state = state_with_order();

        update_order_status(&state, 1, "delivered").unwrap();
        let order = update_order_status(&state, 1, "pending").unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(state.orders.get(&1).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn unknown_status_leaves_order_unchanged() {
        let state = state_with_order();

        let err = update_order_status(&state, 1, "lost").unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(state.orders.get(&1).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn status_update_for_missing_order_is_not_found() {
        let state = state_with_order();
        let err = update_order_status(&state, 99, "ready").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn reassignment_replaces_previous_rider() {
        let state = state_with_order();

        assign_rider(&state, 1, Some(10)).unwrap();
        let order = assign_rider(&state, 1, Some(11)).unwrap();

        assert_eq!(order.rider.map(|r| r.id), Some(11));
    }

    #[test]
    fn unknown_rider_keeps_prior_assignment() {
        let state = state_with_order();
        assign_rider(&state, 1, Some(10)).unwrap();

        let err = assign_rider(&state, 1, Some(404)).unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        let rider = state.orders.get(&1).unwrap().rider.clone();
        assert_eq!(
            rider,
            Some(RiderRef {
                id: 10,
                name: "Tunde".to_string(),
                phone: "07700 900456".to_string(),
            })
        );
    }

    #[test]
    fn inactive_rider_is_rejected() {
        let state = state_with_order();
        state.riders.get_mut(&11).unwrap().is_active = false;

        let err = assign_rider(&state, 1, Some(11)).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(state.orders.get(&1).unwrap().rider.is_none());
    }

    #[test]
    fn clearing_the_rider() {
        let state = state_with_order();
        assign_rider(&state, 1, Some(10)).unwrap();

        let order = assign_rider(&state, 1, None).unwrap();
        assert!(order.rider.is_none());
    }

    #[test]
    fn successful_mutations_are_published() {
        let state = state_with_order();
        let mut changes = state.order_changes_tx.subscribe();

        update_order_status(&state, 1, "preparing").unwrap();
        let _ = assign_rider(&state, 1, Some(404));
        assign_rider(&state, 1, Some(10)).unwrap();

        assert_eq!(changes.try_recv().unwrap().kind, OrderChangeKind::Status);
        assert_eq!(changes.try_recv().unwrap().kind, OrderChangeKind::Rider);
        assert!(changes.try_recv().is_err());
    }
}
