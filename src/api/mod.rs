//! REST API module.
//!
//! Blog routes, comment moderation, uploads, users and the contact form.

mod comments;
mod contact;
mod extract;
mod posts;
mod uploads;
mod users;

pub use comments::*;
pub use contact::*;
pub use extract::ValidatedJson;
pub use posts::*;
pub use uploads::*;
pub use users::*;

use serde::Serialize;

use crate::errors::AppError;

/// Handler result; errors render through `AppError`'s response envelope.
pub type ApiResult<T> = Result<T, AppError>;

/// Plain confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
