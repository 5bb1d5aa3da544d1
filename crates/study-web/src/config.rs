//! Environment-driven server configuration.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;
use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

pub struct Config {
    /// Address the server binds to.
    pub bind: String,
    /// Directory holding the topics and users files.
    pub data_dir: PathBuf,
    /// Token signing secret. No default: the server refuses to start
    /// without one.
    pub jwt_secret: String,
    /// Bearer token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Exact allowed CORS origin; permissive when unset.
    pub cors_origin: Option<String>,
    /// Base URL of the content generation collaborator.
    pub tutor_url: String,
    /// Outbound timeout for collaborator calls.
    pub tutor_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        let jwt_secret = match env::var("STUDY_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => bail!("STUDY_JWT_SECRET must be set"),
        };

        Ok(Self {
            bind: try_load("STUDY_BIND", "127.0.0.1:4000".to_string()),
            data_dir: env::var("STUDY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_data_dir()),
            jwt_secret,
            token_ttl_secs: try_load("STUDY_TOKEN_TTL_SECS", 3600),
            cors_origin: env::var("STUDY_CORS_ORIGIN").ok(),
            tutor_url: try_load(
                "STUDY_TUTOR_URL",
                "http://localhost:9002/api/internal".to_string(),
            ),
            tutor_timeout: Duration::from_secs(try_load("STUDY_TUTOR_TIMEOUT_SECS", 30)),
        })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("study")
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    let raw = match env::var(key) {
        Ok(raw) => raw,
        Err(_) => {
            info!("{key} not set, using default: {default}");
            return default;
        }
    };

    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("invalid {key} value ({e}), using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_parses_and_falls_back() {
        // No env lookups here, just the parse path via a key that is
        // never set in test environments.
        let port: u16 = try_load("STUDY_TEST_UNSET_KEY_XYZ", 4000);
        assert_eq!(port, 4000);
    }
}
