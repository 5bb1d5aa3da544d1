//! Registration and login.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::{sign_token, Claims};
use crate::error::ApiResult;
use crate::state::AppState;
use study_core::Error;

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RegisterInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = state
        .users
        .register(&input.name, &input.email, &input.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "user registered", "user": user })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(input): Json<LoginInput>,
) -> ApiResult<Json<Value>> {
    // Bad credentials answer 400; 401 is reserved for bearer token
    // failures on protected routes.
    let user = state
        .users
        .verify_credentials(&input.email, &input.password)
        .await
        .map_err(|e| match e {
            Error::Auth(msg) => Error::Validation(msg),
            other => other,
        })?;

    let claims = Claims::new(&user.id, &user.name, &user.email, state.config.token_ttl_secs);
    let token = sign_token(&claims, &state.config.jwt_secret)?;

    tracing::info!(user_id = %user.id, "login");
    Ok(Json(json!({
        "msg": "login successful",
        "token": token,
        "user": user.public(),
    })))
}
