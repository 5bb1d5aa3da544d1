//! Topic CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;
use study_core::{Error, Level, NewTopic, Topic, TopicContent, TopicPatch};
use study_tutor::GenerateContentInput;

pub async fn list_topics(State(state): State<Arc<AppState>>) -> Json<Vec<Topic>> {
    Json(state.topics.list().await)
}

pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Topic>> {
    Ok(Json(state.topics.get(&slug).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateTopicInput {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub level: String,
    pub content: Option<TopicContent>,
}

/// Create a topic. When the caller does not supply content, the
/// collaborator generates it; collaborator failures fall back to
/// placeholder content and never fail the request.
pub async fn create_topic(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<CreateTopicInput>,
) -> ApiResult<(StatusCode, Json<Topic>)> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::Validation("title is required".into()).into());
    }
    let level: Level = input.level.parse()?;

    let content = match input.content {
        Some(content) => content,
        None => {
            state
                .tutor
                .generate_content(&GenerateContentInput {
                    topic_name: title.clone(),
                    description: input.description.clone(),
                    base_level: level,
                })
                .await
        }
    };

    let topic = state
        .topics
        .create(
            &claims.sub,
            NewTopic {
                title,
                description: input.description,
                level,
                content: Some(content),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(topic)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTopicInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
}

pub async fn update_topic(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(slug): Path<String>,
    Json(input): Json<UpdateTopicInput>,
) -> ApiResult<Json<Topic>> {
    if input.title.is_none() && input.description.is_none() && input.level.is_none() {
        return Err(Error::Validation(
            "at least one of title, description or level is required".into(),
        )
        .into());
    }

    let level = match input.level {
        Some(raw) => Some(raw.parse::<Level>()?),
        None => None,
    };

    let topic = state
        .topics
        .update(
            &slug,
            &claims.sub,
            TopicPatch {
                title: input.title,
                description: input.description,
                level,
            },
        )
        .await?;

    Ok(Json(topic))
}

pub async fn delete_topic(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    let removed = state.topics.delete(&slug, &claims.sub).await?;
    Ok(Json(json!({
        "msg": format!("topic \"{}\" deleted", removed.title),
    })))
}
