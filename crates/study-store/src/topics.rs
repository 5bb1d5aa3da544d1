//! Topic store
//!
//! Owns the topic collection behind an exclusive async lock. Every
//! mutation happens as a single read-modify-write while the write lock is
//! held, and the full collection is persisted before the call returns, so
//! two concurrent writers cannot lose each other's updates.

use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::storage::JsonStorage;
use study_core::{
    slugify, unique_slug, Error, NewTopic, Result, SlugOutcome, Topic, TopicContent, TopicPatch,
    MAX_SLUG_ATTEMPTS,
};

pub struct TopicStore {
    storage: JsonStorage,
    topics: RwLock<Vec<Topic>>,
}

impl TopicStore {
    /// Open the store, loading whatever is on disk.
    ///
    /// A missing file is an empty collection. So is a malformed one: topic
    /// reads must keep working even if the file was damaged, the damage is
    /// logged and the next successful write replaces it.
    pub fn open(storage: JsonStorage) -> Self {
        let topics = match storage.load::<Vec<Topic>>() {
            Ok(Some(topics)) => topics,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("unreadable topics file, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            storage,
            topics: RwLock::new(topics),
        }
    }

    /// All topics, oldest first.
    pub async fn list(&self) -> Vec<Topic> {
        self.topics.read().await.clone()
    }

    /// Number of stored topics.
    pub async fn count(&self) -> usize {
        self.topics.read().await.len()
    }

    /// Look up a single topic by slug.
    pub async fn get(&self, slug: &str) -> Result<Topic> {
        self.topics
            .read()
            .await
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("topic not found: {}", slug)))
    }

    /// Create a topic owned by `user_id`, deriving its slug from the title.
    pub async fn create(&self, user_id: &str, new: NewTopic) -> Result<Topic> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::Validation("title must not be empty".into()));
        }

        let base = slugify(&title);
        if base.is_empty() {
            return Err(Error::Validation(
                "title does not contain any slug characters".into(),
            ));
        }

        let mut guard = self.topics.write().await;

        let taken: HashSet<String> = guard.iter().map(|t| t.slug.clone()).collect();
        let slug = match unique_slug(&base, &taken, MAX_SLUG_ATTEMPTS) {
            SlugOutcome::Unique(slug) => slug,
            SlugOutcome::Exhausted => {
                return Err(Error::Validation(format!(
                    "could not generate a unique slug for \"{}\"",
                    title
                )))
            }
        };

        let topic = Topic::new(
            slug,
            title,
            new.description,
            new.level,
            new.content.unwrap_or_else(TopicContent::empty),
            user_id,
        );

        let mut next = guard.clone();
        next.push(topic.clone());
        self.storage.save(&next)?;
        *guard = next;

        tracing::info!(slug = %topic.slug, "topic created");
        Ok(topic)
    }

    /// Apply a metadata patch to the topic at `slug`.
    ///
    /// Only the owner may update. A changed title re-derives the slug with
    /// the same retry policy, ignoring the topic's own entry in the
    /// collision scan.
    pub async fn update(&self, slug: &str, user_id: &str, patch: TopicPatch) -> Result<Topic> {
        let mut guard = self.topics.write().await;

        let idx = guard
            .iter()
            .position(|t| t.slug == slug)
            .ok_or_else(|| Error::NotFound(format!("topic not found: {}", slug)))?;

        if guard[idx].user_id != user_id {
            return Err(Error::Forbidden("you do not own this topic".into()));
        }

        let mut next = guard.clone();

        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(Error::Validation("title must not be empty".into()));
            }

            let base = slugify(&title);
            if base.is_empty() {
                return Err(Error::Validation(
                    "title does not contain any slug characters".into(),
                ));
            }

            let taken: HashSet<String> = next
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, t)| t.slug.clone())
                .collect();
            next[idx].slug = match unique_slug(&base, &taken, MAX_SLUG_ATTEMPTS) {
                SlugOutcome::Unique(slug) => slug,
                SlugOutcome::Exhausted => {
                    return Err(Error::Validation(format!(
                        "could not generate a unique slug for \"{}\"",
                        title
                    )))
                }
            };
            next[idx].title = title;
        }

        if let Some(description) = patch.description {
            next[idx].description = Some(description);
        }

        if let Some(level) = patch.level {
            next[idx].level = level;
        }

        next[idx].updated_at = chrono::Utc::now();

        self.storage.save(&next)?;
        let topic = next[idx].clone();
        *guard = next;

        tracing::info!(slug = %topic.slug, "topic updated");
        Ok(topic)
    }

    /// Remove the topic at `slug`, returning the removed record.
    pub async fn delete(&self, slug: &str, user_id: &str) -> Result<Topic> {
        let mut guard = self.topics.write().await;

        let idx = guard
            .iter()
            .position(|t| t.slug == slug)
            .ok_or_else(|| Error::NotFound(format!("topic not found: {}", slug)))?;

        if guard[idx].user_id != user_id {
            return Err(Error::Forbidden("you do not own this topic".into()));
        }

        let mut next = guard.clone();
        let removed = next.remove(idx);
        self.storage.save(&next)?;
        *guard = next;

        tracing::info!(slug = %removed.slug, "topic deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::Level;
    use tempfile::tempdir;

    fn new_topic(title: &str) -> NewTopic {
        NewTopic {
            title: title.into(),
            description: None,
            level: Level::Beginner,
            content: None,
        }
    }

    fn store_at(dir: &std::path::Path) -> TopicStore {
        TopicStore::open(JsonStorage::at_path(dir.join("topics.json")))
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_empty_content() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let topic = store.create("u1", new_topic("Java Basics")).await.unwrap();
        assert_eq!(topic.slug, "java-basics");
        assert_eq!(topic.title, "Java Basics");
        assert!(topic.content.is_empty());
        assert_eq!(topic.created_at, topic.updated_at);
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_content() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let content = TopicContent {
            beginner: vec!["Variables".into()],
            ..TopicContent::empty()
        };
        let topic = store
            .create(
                "u1",
                NewTopic {
                    title: "Java Basics".into(),
                    description: Some("intro".into()),
                    level: Level::Beginner,
                    content: Some(content.clone()),
                },
            )
            .await
            .unwrap();
        assert_eq!(topic.content, content);
        assert_eq!(topic.description.as_deref(), Some("intro"));
    }

    #[tokio::test]
    async fn test_create_suffixes_colliding_slugs() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let first = store.create("u1", new_topic("Java Basics")).await.unwrap();
        let second = store.create("u2", new_topic("Java Basics")).await.unwrap();
        let third = store.create("u1", new_topic("java   BASICS")).await.unwrap();

        assert_eq!(first.slug, "java-basics");
        assert_eq!(second.slug, "java-basics-1");
        assert_eq!(third.slug, "java-basics-2");
    }

    #[tokio::test]
    async fn test_create_exhausts_slug_attempts() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        for _ in 0..MAX_SLUG_ATTEMPTS {
            store.create("u1", new_topic("Repeat Me")).await.unwrap();
        }

        let err = store.create("u1", new_topic("Repeat Me")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unusable_titles() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        assert!(matches!(
            store.create("u1", new_topic("   ")).await.unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            store.create("u1", new_topic("!!!")).await.unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        assert!(matches!(
            store.get("nope").await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_update_requires_ownership_and_leaves_record_intact() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let topic = store.create("u1", new_topic("Java Basics")).await.unwrap();
        let before = serde_json::to_value(&topic).unwrap();

        let err = store
            .update(
                "java-basics",
                "u2",
                TopicPatch {
                    title: Some("Hijacked".into()),
                    ..TopicPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));

        let after = serde_json::to_value(store.get("java-basics").await.unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_update_recomputes_slug_excluding_self() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.create("u1", new_topic("Java Basics")).await.unwrap();
        store.create("u1", new_topic("Rust Basics")).await.unwrap();

        // Re-titling to itself keeps the slug stable
        let same = store
            .update(
                "java-basics",
                "u1",
                TopicPatch {
                    title: Some("Java Basics".into()),
                    ..TopicPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.slug, "java-basics");

        // Re-titling onto another topic's slug picks up a suffix
        let moved = store
            .update(
                "java-basics",
                "u1",
                TopicPatch {
                    title: Some("Rust Basics".into()),
                    ..TopicPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.slug, "rust-basics-1");
        assert_eq!(moved.title, "Rust Basics");
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let topic = store.create("u1", new_topic("Java Basics")).await.unwrap();
        let updated = store
            .update(
                "java-basics",
                "u1",
                TopicPatch {
                    level: Some(Level::Advanced),
                    ..TopicPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.level, Level::Advanced);
        assert!(updated.updated_at > topic.updated_at);
        assert_eq!(updated.created_at, topic.created_at);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.create("u1", new_topic("Java Basics")).await.unwrap();

        let err = store.delete("java-basics", "u2").await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert_eq!(store.count().await, 1);

        let removed = store.delete("java-basics", "u1").await.unwrap();
        assert_eq!(removed.title, "Java Basics");
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_reopen_sees_persisted_topics() {
        let dir = tempdir().unwrap();

        {
            let store = store_at(dir.path());
            store.create("u1", new_topic("Java Basics")).await.unwrap();
            store.create("u1", new_topic("Rust Basics")).await.unwrap();
        }

        let reopened = store_at(dir.path());
        assert_eq!(reopened.count().await, 2);
        assert_eq!(
            reopened.get("rust-basics").await.unwrap().title,
            "Rust Basics"
        );
    }

    #[tokio::test]
    async fn test_malformed_file_starts_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("topics.json"), "{ not json").unwrap();

        let store = store_at(dir.path());
        assert_eq!(store.count().await, 0);

        // Writing repairs the file
        store.create("u1", new_topic("Java Basics")).await.unwrap();
        let reopened = store_at(dir.path());
        assert_eq!(reopened.count().await, 1);
    }
}
