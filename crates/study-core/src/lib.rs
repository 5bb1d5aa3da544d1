//! Study Core
//!
//! Shared domain types for the study service:
//! - Topics, per-level learning content and difficulty levels
//! - Users (stored vs. public shapes)
//! - Quiz questions
//! - Slug derivation with collision retry
//! - The error taxonomy every other crate maps onto

pub mod error;
pub mod quiz;
pub mod slug;
pub mod topic;
pub mod user;

pub use error::{Error, Result};
pub use quiz::QuizQuestion;
pub use slug::{slugify, unique_slug, SlugOutcome, MAX_SLUG_ATTEMPTS};
pub use topic::{Level, NewTopic, Topic, TopicContent, TopicPatch};
pub use user::{PublicUser, User};
