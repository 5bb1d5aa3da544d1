//! Quiz questions.
//!
//! Quizzes are ephemeral: generated on demand, returned to the caller,
//! never persisted.

use serde::{Deserialize, Serialize};

/// A single multiple-choice question with exactly four options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
}
