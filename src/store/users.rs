//! User records.

use std::collections::HashMap;

use chrono::Utc;

use super::ContentStore;
use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::{CreateUserRequest, User, UserRecord};

impl ContentStore {
    pub async fn get_user(&self, id: &str) -> Option<User> {
        self.data.read().await.users.get(id).cloned()
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.data
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Create a user with an argon2-hashed password. Usernames are unique.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, AppError> {
        let username = request.username.trim().to_string();
        if self.get_user_by_username(&username).await.is_some() {
            return Err(username_taken_error(&username));
        }

        // Argon2 is CPU-bound; run it on the blocking pool.
        let password_hash = hash_blocking(request.password.clone()).await?;

        let mut data = self.data.write().await;
        // Re-check under the write lock; another request may have won the race.
        if data.users.values().any(|u| u.username == username) {
            return Err(username_taken_error(&username));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            password_hash,
            created_at: Utc::now(),
        };
        self.commit(&mut data, |next| {
            next.users.insert(user.id.clone(), user.clone());
        })
        .await?;

        tracing::info!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Check a username/password pair.
    pub async fn verify_user(&self, username: &str, password: &str) -> bool {
        let Some(user) = self.get_user_by_username(username).await else {
            return false;
        };
        let password = password.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &user.password_hash))
            .await
            .unwrap_or(false)
    }
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// Turn stored records into users. Plaintext passwords from older files are
/// hashed; records with no password at all are dropped. Returns true when
/// anything changed and the file needs rewriting.
pub(super) async fn users_from_records(
    records: Vec<UserRecord>,
) -> Result<(HashMap<String, User>, bool), AppError> {
    let mut users = HashMap::with_capacity(records.len());
    let mut upgraded = false;

    for record in records {
        let password_hash = match (record.password_hash, record.password) {
            (Some(hash), _) => hash,
            (None, Some(password)) => {
                tracing::warn!("Hashing legacy plaintext password of user {}", record.username);
                upgraded = true;
                hash_blocking(password).await?
            }
            (None, None) => {
                tracing::warn!("Dropping user {} with no password", record.username);
                upgraded = true;
                continue;
            }
        };
        let id = if record.id.is_empty() {
            upgraded = true;
            uuid::Uuid::new_v4().to_string()
        } else {
            record.id
        };
        let created_at = record.created_at.unwrap_or_else(|| {
            upgraded = true;
            Utc::now()
        });

        users.insert(
            id.clone(),
            User {
                id,
                username: record.username,
                password_hash,
                created_at,
            },
        );
    }

    Ok((users, upgraded))
}

fn username_taken_error(username: &str) -> AppError {
    AppError::Conflict(format!("Username \"{}\" is already taken", username))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = ContentStore::in_memory();
        let user = store.create_user(&request("editor")).await.unwrap();

        assert_ne!(user.password_hash, "correct horse");
        assert_eq!(store.get_user(&user.id).await, Some(user.clone()));
        assert_eq!(store.get_user_by_username("editor").await, Some(user));
        assert!(store.get_user_by_username("nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let store = ContentStore::in_memory();
        store.create_user(&request("editor")).await.unwrap();
        let err = store.create_user(&request("editor")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_verify_user() {
        let store = ContentStore::in_memory();
        store.create_user(&request("editor")).await.unwrap();
        assert!(store.verify_user("editor", "correct horse").await);
        assert!(!store.verify_user("editor", "wrong").await);
        assert!(!store.verify_user("ghost", "correct horse").await);
    }
}
