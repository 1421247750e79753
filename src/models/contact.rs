//! Contact form payload.

use serde::{Deserialize, Serialize};

/// Contact form submission. Nothing is rejected; the payload only gets logged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Reply sent for every contact submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub redirect: String,
}
