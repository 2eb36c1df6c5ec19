use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::models::order::{LineItem, Order, OrderStatus};

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").unwrap()
}

pub fn order(id: i64, created_at: &str) -> Order {
    Order {
        id,
        created_at: at(created_at),
        delivery_date: None,
        delivery_time: None,
        status: OrderStatus::Pending,
        total_amount: Decimal::new(2450, 2),
        customer_name: "Ada Obi".to_string(),
        customer_phone: "07700 900123".to_string(),
        customer_address: "12 Market Street".to_string(),
        customer_postcode: "M1 1AE".to_string(),
        city: None,
        rider: None,
        line_items: vec![LineItem {
            quantity: 2,
            unit_price: Decimal::new(1225, 2),
            menu_item_name: Some("Egusi Soup".to_string()),
            custom_name: None,
            is_custom: false,
        }],
    }
}

pub fn scheduled(id: i64, created_at: &str, date: &str, time: &str) -> Order {
    let mut order = order(id, created_at);
    order.delivery_date = Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap());
    order.delivery_time = Some(NaiveTime::parse_from_str(time, "%H:%M").unwrap());
    order
}
