//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};

/// A site user. Only the argon2 hash of the password is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// What the API returns for a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

/// A user as stored in the data file. Files from before password hashing
/// carry a plaintext `password` and no `createdAt`; the store upgrades
/// those on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            password_hash: Some(user.password_hash.clone()),
            password: None,
            created_at: Some(user.created_at),
        }
    }
}

/// Request body for creating a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

const MIN_PASSWORD_LEN: usize = 8;

impl Validate for CreateUserRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let username = self.username.trim();
        if username.len() < 3 || username.len() > 64 {
            problems.push("username must be between 3 and 64 characters".to_string());
        } else if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            problems.push("username may contain letters, digits, '.', '_' and '-'".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            problems.push(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        problems
    }
}

/// Credentials exchanged for the admin token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        require(&mut problems, "username", &self.username);
        require(&mut problems, "password", &self.password);
        problems
    }
}

/// Successful login. `token` is absent when the server runs without an admin token.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: Option<String>,
    pub user: UserView,
}
