//! User store
//!
//! Credential storage keyed by lowercase email. Unlike the topics file, a
//! malformed users file refuses to load: silently dropping credentials
//! would lock every account out, so startup fails instead.

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::storage::JsonStorage;
use study_core::{Error, PublicUser, Result, User};

const BCRYPT_COST: u32 = 10;
const MIN_PASSWORD_LEN: usize = 6;

pub struct UserStore {
    storage: JsonStorage,
    users: RwLock<HashMap<String, User>>,
}

impl UserStore {
    /// Open the store, loading whatever is on disk.
    pub fn open(storage: JsonStorage) -> Result<Self> {
        let users = storage.load::<HashMap<String, User>>()?.unwrap_or_default();

        Ok(Self {
            storage,
            users: RwLock::new(users),
        })
    }

    /// Number of registered users.
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Register a new account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<PublicUser> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(Error::Validation(
                "name, email and password are required".into(),
            ));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let key = email.to_lowercase();
        let mut guard = self.users.write().await;

        if guard.contains_key(&key) {
            return Err(Error::Conflict("email is already registered".into()));
        }

        let password_hash = bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| Error::Storage(format!("password hashing failed: {}", e)))?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: chrono::Utc::now(),
        };

        let mut next = guard.clone();
        next.insert(key, user.clone());
        self.storage.save(&next)?;
        *guard = next;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user.public())
    }

    /// Check a login attempt.
    ///
    /// Unknown email and wrong password produce the same error; the
    /// distinction only appears in the server log.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User> {
        let key = email.trim().to_lowercase();
        let guard = self.users.read().await;

        let user = match guard.get(&key) {
            Some(user) => user,
            None => {
                tracing::warn!("login attempt for unknown email");
                return Err(Error::Auth("invalid credentials".into()));
            }
        };

        let ok = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| Error::Storage(format!("password verification failed: {}", e)))?;
        if !ok {
            tracing::warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(Error::Auth("invalid credentials".into()));
        }

        Ok(user.clone())
    }

    /// Update name and/or email of an existing account.
    pub async fn update_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<PublicUser> {
        if name.is_none() && email.is_none() {
            return Err(Error::Validation(
                "at least one of name or email is required".into(),
            ));
        }

        let mut guard = self.users.write().await;

        let old_key = guard
            .iter()
            .find(|(_, u)| u.id == user_id)
            .map(|(k, _)| k.clone())
            .ok_or_else(|| Error::NotFound("user not found".into()))?;

        let mut next = guard.clone();
        let mut user = match next.remove(&old_key) {
            Some(user) => user,
            None => return Err(Error::NotFound("user not found".into())),
        };

        if let Some(name) = name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Validation("name must not be empty".into()));
            }
            user.name = name;
        }

        if let Some(email) = email {
            let email = email.trim().to_string();
            if email.is_empty() {
                return Err(Error::Validation("email must not be empty".into()));
            }
            let new_key = email.to_lowercase();
            if new_key != old_key && next.contains_key(&new_key) {
                return Err(Error::Conflict("email is already registered".into()));
            }
            user.email = email;
        }

        let new_key = user.email.to_lowercase();
        let public = user.public();
        next.insert(new_key, user);
        self.storage.save(&next)?;
        *guard = next;

        tracing::info!(user_id = %public.id, "profile updated");
        Ok(public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(dir: &std::path::Path) -> UserStore {
        UserStore::open(JsonStorage::at_path(dir.join("users.json"))).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let user = store
            .register("Ana", "ana@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(user.name, "Ana");

        let verified = store
            .verify_credentials("ana@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(verified.id, user.id);
        assert!(verified.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store
            .register("Ana", "ana@example.com", "secret1")
            .await
            .unwrap();

        let wrong_password = store
            .verify_credentials("ana@example.com", "nope99")
            .await
            .unwrap_err();
        let unknown_email = store
            .verify_credentials("ghost@example.com", "secret1")
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, Error::Auth(_)));
        assert!(matches!(unknown_email, Error::Auth(_)));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        assert!(matches!(
            store.register("", "a@b.com", "secret1").await.unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            store.register("Ana", "a@b.com", "short").await.unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store
            .register("Ana", "ana@example.com", "secret1")
            .await
            .unwrap();
        let err = store
            .register("Other", "ANA@example.com", "secret2")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store
            .register("Ana", "Ana@Example.com", "secret1")
            .await
            .unwrap();
        assert!(store
            .verify_credentials("ana@example.com", "secret1")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let user = store
            .register("Ana", "ana@example.com", "secret1")
            .await
            .unwrap();

        let updated = store
            .update_profile(&user.id, Some("Ana Maria".into()), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.email, "ana@example.com");

        let moved = store
            .update_profile(&user.id, None, Some("ana.maria@example.com".into()))
            .await
            .unwrap();
        assert_eq!(moved.email, "ana.maria@example.com");

        // Old address is free again, login works under the new one
        assert!(store
            .verify_credentials("ana.maria@example.com", "secret1")
            .await
            .is_ok());
        assert!(store
            .verify_credentials("ana@example.com", "secret1")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_update_profile_guards() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let ana = store
            .register("Ana", "ana@example.com", "secret1")
            .await
            .unwrap();
        store
            .register("Ben", "ben@example.com", "secret2")
            .await
            .unwrap();

        assert!(matches!(
            store.update_profile(&ana.id, None, None).await.unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            store
                .update_profile("missing-id", Some("X".into()), None)
                .await
                .unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            store
                .update_profile(&ana.id, None, Some("ben@example.com".into()))
                .await
                .unwrap_err(),
            Error::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn test_reopen_sees_persisted_users() {
        let dir = tempdir().unwrap();

        {
            let store = store_at(dir.path());
            store
                .register("Ana", "ana@example.com", "secret1")
                .await
                .unwrap();
        }

        let reopened = store_at(dir.path());
        assert_eq!(reopened.count().await, 1);
        assert!(reopened
            .verify_credentials("ana@example.com", "secret1")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_malformed_users_file_refuses_to_open() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("users.json"), "{ not json").unwrap();

        let result = UserStore::open(JsonStorage::at_path(dir.path().join("users.json")));
        assert!(result.is_err());
    }
}
