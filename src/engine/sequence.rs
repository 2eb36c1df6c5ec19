use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::models::order::Order;

/// Orders are numbered per creation day by `(created_at, id)`.
fn sequence_key(order: &Order) -> (NaiveDateTime, i64) {
    (order.created_at, order.id)
}

/// 1-based position of `order` among all orders created on the same calendar day.
pub fn daily_sequence(order: &Order, all_orders: &[Order]) -> u32 {
    let day = order.created_at.date();
    let key = sequence_key(order);

    let earlier = all_orders
        .iter()
        .filter(|other| other.created_at.date() == day && sequence_key(other) < key)
        .count();

    u32::try_from(earlier).unwrap_or(u32::MAX - 1) + 1
}

/// Numbers every order in one pass. Equivalent to calling [`daily_sequence`] per order.
pub fn daily_sequences<'a, I>(orders: I) -> HashMap<i64, u32>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut keys: Vec<(NaiveDateTime, i64)> = orders.into_iter().map(sequence_key).collect();
    keys.sort_unstable();

    let mut sequences = HashMap::with_capacity(keys.len());
    let mut current_day = None;
    let mut counter = 0u32;

    for (created_at, id) in keys {
        let day = created_at.date();
        if current_day != Some(day) {
            current_day = Some(day);
            counter = 0;
        }
        counter = counter.saturating_add(1);
        sequences.insert(id, counter);
    }

    sequences
}

#[cfg(test)]
mod tests {
    use super::{daily_sequence, daily_sequences};
    use crate::models::fixtures::order;

    #[test]
    fn earlier_orders_get_lower_numbers() {
        let orders = vec![
            order(10, "2024-01-10T08:00:00"),
            order(11, "2024-01-10T09:30:00"),
            order(12, "2024-01-10T12:00:00"),
        ];

        assert_eq!(daily_sequence(&orders[0], &orders), 1);
        assert_eq!(daily_sequence(&orders[1], &orders), 2);
        assert_eq!(daily_sequence(&orders[2], &orders), 3);
    }

    #[test]
    fn identical_timestamps_fall_back_to_id() {
        let orders = vec![order(5, "2024-01-10T09:00:00"), order(3, "2024-01-10T09:00:00")];

        assert_eq!(daily_sequence(&orders[1], &orders), 1);
        assert_eq!(daily_sequence(&orders[0], &orders), 2);
    }

    #[test]
    fn numbering_restarts_each_day() {
        let orders = vec![
            order(1, "2024-01-09T23:59:59"),
            order(2, "2024-01-10T00:00:00"),
            order(3, "2024-01-10T07:45:00"),
        ];

        assert_eq!(daily_sequence(&orders[0], &orders), 1);
        assert_eq!(daily_sequence(&orders[1], &orders), 1);
        assert_eq!(daily_sequence(&orders[2], &orders), 2);
    }

    #[test]
    fn later_orders_do_not_shift_existing_numbers() {
        let mut orders = vec![order(1, "2024-01-10T08:00:00"), order(2, "2024-01-10T10:00:00")];
        let before = daily_sequence(&orders[1], &orders);

        orders.push(order(3, "2024-01-10T11:00:00"));
        orders.push(order(4, "2024-01-10T18:00:00"));

        assert_eq!(daily_sequence(&orders[1], &orders), before);
    }

    #[test]
    fn order_outside_the_collection_still_gets_a_number() {
        let orders = vec![order(1, "2024-01-10T08:00:00")];
        let newcomer = order(2, "2024-01-10T09:00:00");

        assert_eq!(daily_sequence(&newcomer, &orders), 2);
    }

    #[test]
    fn bulk_numbering_matches_single_lookup() {
        let orders = vec![
            order(7, "2024-01-10T09:00:00"),
            order(4, "2024-01-11T09:00:00"),
            order(2, "2024-01-10T09:00:00"),
            order(9, "2024-01-10T06:15:00"),
            order(1, "2024-01-11T08:00:00"),
        ];

        let bulk = daily_sequences(&orders);
        for o in &orders {
            assert_eq!(bulk[&o.id], daily_sequence(o, &orders), "order {}", o.id);
        }
    }
}
