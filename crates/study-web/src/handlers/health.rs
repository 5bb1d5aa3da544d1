//! Liveness endpoint.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "topics": state.topics.count().await,
        "uptime_secs": state.uptime_secs(),
    }))
}
