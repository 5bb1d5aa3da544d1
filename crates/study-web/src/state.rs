//! Shared application state.
//!
//! Stores and the collaborator client are constructed once at startup and
//! injected here; nothing in the request path reaches for globals.

use anyhow::Context;
use study_store::{JsonStorage, TopicStore, UserStore};
use study_tutor::TutorClient;

use crate::config::Config;

pub struct AppState {
    pub config: Config,
    pub topics: TopicStore,
    pub users: UserStore,
    pub tutor: TutorClient,
    /// Server start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("cannot create data dir {}", config.data_dir.display()))?;

        let topics = TopicStore::open(JsonStorage::at_path(config.data_dir.join("topics.json")));
        let users = UserStore::open(JsonStorage::at_path(config.data_dir.join("users.json")))
            .context("users file is unreadable; refusing to start")?;
        let tutor = TutorClient::new(&config.tutor_url, config.tutor_timeout)?;

        Ok(Self {
            config,
            topics,
            users,
            tutor,
            started_at: chrono::Utc::now(),
        })
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}
