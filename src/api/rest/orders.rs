use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::dispatch::{assign_rider, update_order_status};
use crate::engine::sequence::daily_sequences;
use crate::error::AppError;
use crate::models::order::{
    parse_delivery_time, CityRef, LineItem, Order, OrderChange, OrderChangeKind, OrderStatus,
};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", patch(update_status))
        .route("/orders/:id/rider", patch(update_rider))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_postcode: String,
    #[serde(default)]
    pub city: Option<CityRef>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct UpdateRiderRequest {
    pub rider_id: Option<i64>,
}

#[derive(Serialize)]
pub struct OrderListing {
    pub daily_sequence: u32,
    #[serde(flatten)]
    pub order: Order,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    if payload.customer_name.trim().is_empty() {
        return Err(AppError::Validation("customer_name cannot be empty".to_string()));
    }

    let status = match payload.status.as_deref() {
        Some(raw) => raw.parse::<OrderStatus>()?,
        None => OrderStatus::Pending,
    };
    let delivery_time = payload
        .delivery_time
        .as_deref()
        .map(parse_delivery_time)
        .transpose()?;

    let order = Order {
        id: state.next_order_id(),
        created_at: payload.created_at.unwrap_or_else(|| state.clock.now()),
        delivery_date: payload.delivery_date,
        delivery_time,
        status,
        total_amount: payload.total_amount,
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        customer_address: payload.customer_address,
        customer_postcode: payload.customer_postcode,
        city: payload.city,
        rider: None,
        line_items: payload.line_items,
    };

    state.orders.insert(order.id, order.clone());
    state.publish(OrderChange {
        order_id: order.id,
        kind: OrderChangeKind::Created,
    });
    info!(order_id = order.id, status = %order.status, "order received");

    Ok(Json(order))
}

async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<OrderListing>> {
    let mut orders = state.order_snapshot();
    orders.sort_by_key(|order| (order.created_at, order.id));

    let sequences = daily_sequences(&orders);
    let listings = orders
        .into_iter()
        .map(|order| OrderListing {
            daily_sequence: sequences.get(&order.id).copied().unwrap_or(1),
            order,
        })
        .collect();

    Json(listings)
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))?;

    Ok(Json(order.value().clone()))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    update_order_status(&state, id, &payload.status).map(Json)
}

async fn update_rider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRiderRequest>,
) -> Result<Json<Order>, AppError> {
    assign_rider(&state, id, payload.rider_id).map(Json)
}
