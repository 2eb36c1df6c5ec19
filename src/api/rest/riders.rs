use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::models::rider::DeliveryRider;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/riders", post(create_rider).get(list_riders))
        .route("/riders/:id", delete(delete_rider))
        .route("/riders/:id/active", patch(update_rider_active))
}

#[derive(Deserialize)]
pub struct CreateRiderRequest {
    pub name: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct UpdateActiveRequest {
    pub is_active: bool,
}

async fn create_rider(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRiderRequest>,
) -> Result<Json<DeliveryRider>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    if payload.phone.trim().is_empty() {
        return Err(AppError::Validation("phone cannot be empty".to_string()));
    }

    let rider = DeliveryRider {
        id: state.next_rider_id(),
        name: payload.name.trim().to_string(),
        phone: payload.phone.trim().to_string(),
        is_active: true,
    };

    state.riders.insert(rider.id, rider.clone());
    info!(rider_id = rider.id, "rider registered");
    Ok(Json(rider))
}

async fn list_riders(State(state): State<Arc<AppState>>) -> Json<Vec<DeliveryRider>> {
    let mut riders: Vec<DeliveryRider> = state
        .riders
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    riders.sort_by_key(|rider| rider.id);
    Json(riders)
}

async fn update_rider_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateActiveRequest>,
) -> Result<Json<DeliveryRider>, AppError> {
    let mut rider = state
        .riders
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("rider {} not found", id)))?;

    rider.is_active = payload.is_active;

    Ok(Json(rider.clone()))
}

async fn delete_rider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.riders.contains_key(&id) {
        return Err(AppError::NotFound(format!("rider {} not found", id)));
    }

    let assigned = state
        .orders
        .iter()
        .filter(|entry| entry.value().rider.as_ref().is_some_and(|rider| rider.id == id))
        .count();
    if assigned > 0 {
        return Err(AppError::Conflict(format!(
            "rider {id} is assigned to {assigned} order(s)"
        )));
    }

    state.riders.remove(&id);
    info!(rider_id = id, "rider removed");
    Ok(StatusCode::NO_CONTENT)
}
