//! Quiz generation. Quizzes are ephemeral and never persisted.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use study_core::{Error, Level};
use study_tutor::{QuizInput, MAX_QUIZ_QUESTIONS};

const DEFAULT_QUESTIONS: u32 = 5;

#[derive(Debug, Deserialize)]
pub struct QuizRequestInput {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub level: String,
    pub num_questions: Option<u32>,
}

pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Json(input): Json<QuizRequestInput>,
) -> ApiResult<Json<Value>> {
    let topic = input.topic.trim().to_string();
    if topic.is_empty() {
        return Err(Error::Validation("topic is required".into()).into());
    }
    let level: Level = input.level.parse()?;

    let count = input.num_questions.unwrap_or(DEFAULT_QUESTIONS);
    if !(1..=MAX_QUIZ_QUESTIONS as u32).contains(&count) {
        return Err(ApiError::from(Error::Validation(
            "num_questions out of range".into(),
        ))
        .with_details(format!(
            "expected a value between 1 and {}",
            MAX_QUIZ_QUESTIONS
        )));
    }

    let questions = state
        .tutor
        .generate_quiz(&QuizInput {
            topic,
            level,
            num_questions: count as u8,
        })
        .await;

    Ok(Json(json!({ "questions": questions })))
}
