use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::rider::RiderRef;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    InQueue,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
    Confirmed,
    Ready,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::InQueue,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Confirmed,
        OrderStatus::Ready,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InQueue => "in-queue",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Ready => "ready",
        }
    }

    /// Statuses that keep an order on the kitchen/dispatch queue.
    pub fn is_queued(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending
                | OrderStatus::InQueue
                | OrderStatus::Preparing
                | OrderStatus::OutForDelivery
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == needle)
            .ok_or_else(|| AppError::Validation(format!("unknown order status: {raw}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CityRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub menu_item_name: Option<String>,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

impl LineItem {
    /// Custom items carry their own name; everything else shows the linked menu item.
    pub fn display_name(&self) -> Result<&str, AppError> {
        let (name, source) = if self.is_custom {
            (self.custom_name.as_deref(), "custom name")
        } else {
            (self.menu_item_name.as_deref(), "menu item name")
        };

        match name.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(AppError::Validation(format!("line item is missing its {source}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default, with = "delivery_time")]
    pub delivery_time: Option<NaiveTime>,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_postcode: String,
    #[serde(default)]
    pub city: Option<CityRef>,
    #[serde(default)]
    pub rider: Option<RiderRef>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// Published whenever an order is created or mutated so open dashboards can re-project.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderChange {
    pub order_id: i64,
    pub kind: OrderChangeKind,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderChangeKind {
    Created,
    Status,
    Rider,
}

/// Parses a delivery time of day, `HH:MM` or `HH:MM:SS`.
pub fn parse_delivery_time(raw: &str) -> Result<NaiveTime, AppError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|err| AppError::Validation(format!("invalid delivery time '{raw}': {err}")))
}

mod delivery_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_some(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|raw| super::parse_delivery_time(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    use super::{parse_delivery_time, LineItem, OrderStatus};
    use crate::error::AppError;

    #[test]
    fn status_parses_kebab_case_names() {
        assert_eq!("in-queue".parse::<OrderStatus>().unwrap(), OrderStatus::InQueue);
        assert_eq!(
            "out-for-delivery".parse::<OrderStatus>().unwrap(),
            OrderStatus::OutForDelivery
        );
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn only_kitchen_statuses_are_queued() {
        let queued: Vec<_> = OrderStatus::ALL.into_iter().filter(|s| s.is_queued()).collect();
        assert_eq!(
            queued,
            vec![
                OrderStatus::Pending,
                OrderStatus::InQueue,
                OrderStatus::Preparing,
                OrderStatus::OutForDelivery,
            ]
        );
    }

    #[test]
    fn delivery_time_accepts_minutes_and_seconds() {
        let expected = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
        assert_eq!(parse_delivery_time("09:15").unwrap(), expected);
        assert_eq!(parse_delivery_time("09:15:00").unwrap(), expected);
        assert!(parse_delivery_time("quarter past nine").is_err());
    }

    #[test]
    fn custom_line_item_uses_custom_name() {
        let item = LineItem {
            quantity: 1,
            unit_price: Decimal::new(450, 2),
            menu_item_name: Some("Jollof Rice".to_string()),
            custom_name: Some("Extra spicy stew".to_string()),
            is_custom: true,
        };
        assert_eq!(item.display_name().unwrap(), "Extra spicy stew");
    }

    #[test]
    fn menu_line_item_without_name_is_rejected() {
        let item = LineItem {
            quantity: 2,
            unit_price: Decimal::new(900, 2),
            menu_item_name: Some("   ".to_string()),
            custom_name: None,
            is_custom: false,
        };
        assert!(item.display_name().is_err());
    }
}
