//! Collaborator API client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use study_core::{Error, Level, QuizQuestion, Result, TopicContent};

pub const MAX_QUIZ_QUESTIONS: u8 = 10;

/// Input for content generation.
#[derive(Debug, Clone)]
pub struct GenerateContentInput {
    pub topic_name: String,
    pub description: Option<String>,
    pub base_level: Level,
}

/// Input for quiz generation.
#[derive(Debug, Clone)]
pub struct QuizInput {
    pub topic: String,
    pub level: Level,
    pub num_questions: u8,
}

#[derive(Serialize)]
struct ContentRequest<'a> {
    #[serde(rename = "topicName")]
    topic_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "baseLevel")]
    base_level: &'a str,
}

/// The collaborator answers with lowercase level keys; stored content uses
/// the capitalized ones.
#[derive(Deserialize)]
struct ContentResponse {
    beginner: Vec<String>,
    intermediate: Vec<String>,
    advanced: Vec<String>,
}

#[derive(Serialize)]
struct QuizRequest<'a> {
    topic: &'a str,
    level: &'a str,
    #[serde(rename = "numQuestions")]
    num_questions: u8,
}

/// Collaborator client with bounded timeouts.
pub struct TutorClient {
    http: reqwest::Client,
    base_url: String,
}

impl TutorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Storage(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Generate per-level learning content for a topic.
    ///
    /// Infallible: any collaborator failure is logged and answered with
    /// the deterministic fallback instead.
    pub async fn generate_content(&self, input: &GenerateContentInput) -> TopicContent {
        let request = ContentRequest {
            topic_name: &input.topic_name,
            description: input.description.as_deref(),
            base_level: input.base_level.as_str(),
        };

        match self.post_content(&request).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    topic = %input.topic_name,
                    "content generation failed, using fallback: {}",
                    e
                );
                fallback_content(&input.topic_name, input.description.as_deref())
            }
        }
    }

    async fn post_content(&self, request: &ContentRequest<'_>) -> Result<TopicContent> {
        let url = format!("{}/generate-topic-content", self.base_url);
        let response: ContentResponse = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Storage(format!("collaborator error: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::Storage(format!("malformed response: {}", e)))?;

        Ok(TopicContent {
            beginner: response.beginner,
            intermediate: response.intermediate,
            advanced: response.advanced,
        })
    }

    /// Generate a quiz for a topic at a level.
    ///
    /// `num_questions` is clamped to 1..=10. Infallible the same way as
    /// [`TutorClient::generate_content`].
    pub async fn generate_quiz(&self, input: &QuizInput) -> Vec<QuizQuestion> {
        let count = input.num_questions.clamp(1, MAX_QUIZ_QUESTIONS);
        let request = QuizRequest {
            topic: &input.topic,
            level: input.level.as_str(),
            num_questions: count,
        };

        match self.post_quiz(&request).await {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                tracing::warn!(topic = %input.topic, "collaborator returned an empty quiz, using fallback");
                fallback_quiz(&input.topic, input.level, count)
            }
            Err(e) => {
                tracing::warn!(topic = %input.topic, "quiz generation failed, using fallback: {}", e);
                fallback_quiz(&input.topic, input.level, count)
            }
        }
    }

    async fn post_quiz(&self, request: &QuizRequest<'_>) -> Result<Vec<QuizQuestion>> {
        let url = format!("{}/generate-quiz", self.base_url);
        let questions: Vec<QuizQuestion> = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Storage(format!("collaborator error: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::Storage(format!("malformed response: {}", e)))?;

        Ok(questions)
    }
}

/// Placeholder content: one entry per level naming the topic.
pub fn fallback_content(topic_name: &str, description: Option<&str>) -> TopicContent {
    let beginner = match description {
        Some(description) => format!(
            "Introduction to {}: {} (Beginner)",
            topic_name, description
        ),
        None => format!("Introduction to {} (Beginner)", topic_name),
    };

    TopicContent {
        beginner: vec![beginner],
        intermediate: vec![format!("Core concepts of {} (Intermediate)", topic_name)],
        advanced: vec![format!("Advanced topics in {} (Advanced)", topic_name)],
    }
}

/// Placeholder quiz of `count` questions, each with four distinct options.
pub fn fallback_quiz(topic: &str, level: Level, count: u8) -> Vec<QuizQuestion> {
    (1..=count)
        .map(|n| {
            let options = [
                format!("Answer A for question {}", n),
                format!("Answer B for question {}", n),
                format!("Answer C for question {}", n),
                format!("Answer D for question {}", n),
            ];
            QuizQuestion {
                question: format!("Placeholder question {} about {} ({} level)", n, topic, level),
                correct_answer: options[0].clone(),
                options,
            }
        })
        .collect()
}
