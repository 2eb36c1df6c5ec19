use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Json;
use axum::Router;

use crate::engine::queue::{list_active_queue, next_order_info};
use crate::models::queue::{NextOrderInfo, QueueEntry};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/queue", get(get_queue))
        .route("/queue/next", get(get_next_order))
}

async fn get_queue(State(state): State<Arc<AppState>>) -> Json<Vec<QueueEntry>> {
    let now = state.clock.now();
    Json(list_active_queue(&state, now))
}

async fn get_next_order(State(state): State<Arc<AppState>>) -> Json<Option<NextOrderInfo>> {
    let now = state.clock.now();
    let entries = list_active_queue(&state, now);
    Json(next_order_info(&entries))
}
