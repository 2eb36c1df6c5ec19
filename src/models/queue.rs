use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::order::{CityRef, OrderStatus};
use crate::models::rider::RiderRef;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
    Info,
    None,
}

impl AlertLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertLevel::Critical => "critical",
            AlertLevel::Warning => "warning",
            AlertLevel::Info => "info",
            AlertLevel::None => "none",
        }
    }

    /// Only critical and warning orders raise audible alerts.
    pub fn is_alerting(self) -> bool {
        matches!(self, AlertLevel::Critical | AlertLevel::Warning)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Countdown {
    pub delivery_at: NaiveDateTime,
    /// Negative once the delivery is overdue.
    pub minutes_remaining: i64,
    pub hours: i64,
    pub minutes: i64,
    pub formatted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueLineItem {
    pub name: String,
    pub is_custom: bool,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    pub order_id: i64,
    pub daily_sequence: u32,
    pub status: OrderStatus,
    pub countdown: Countdown,
    pub alert_level: AlertLevel,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_postcode: String,
    pub city: Option<CityRef>,
    pub rider: Option<RiderRef>,
    pub line_items: Vec<QueueLineItem>,
}

/// Banner data for the order that has to leave the kitchen next.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NextOrderInfo {
    pub entry: QueueEntry,
    pub queue_length: usize,
    pub critical_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountdownUpdate {
    pub order_id: i64,
    pub countdown: Countdown,
    pub alert_level: AlertLevel,
}

impl From<&QueueEntry> for CountdownUpdate {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            order_id: entry.order_id,
            countdown: entry.countdown.clone(),
            alert_level: entry.alert_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertPulse {
    pub order_id: i64,
    pub daily_sequence: u32,
    pub level: AlertLevel,
    pub minutes_remaining: i64,
}
