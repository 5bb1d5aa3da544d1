//! Profile updates.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<ProfileInput>,
) -> ApiResult<Json<Value>> {
    let user = state
        .users
        .update_profile(&claims.sub, input.name, input.email)
        .await?;

    Ok(Json(json!({ "msg": "profile updated", "user": user })))
}
