//! Study Tutor
//!
//! Client for the content generation collaborator. The collaborator is a
//! black box over HTTP/JSON; every call is bounded by a timeout and every
//! failure degrades to deterministic placeholder output, so topic creation
//! and quizzes keep working when the collaborator is down.

pub mod client;

pub use client::{GenerateContentInput, QuizInput, TutorClient, MAX_QUIZ_QUESTIONS};
