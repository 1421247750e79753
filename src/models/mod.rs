//! Data models for the blog backend.
//!
//! Field names serialize in camelCase to match what the site frontend consumes.

mod comment;
mod contact;
mod post;
mod snapshot;
mod user;

pub use comment::*;
pub use contact::*;
pub use post::*;
pub use snapshot::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

/// Field-level checks run on a request body after deserialization.
pub trait Validate {
    /// Returns every failed check, in field order.
    fn problems(&self) -> Vec<String>;

    fn validate(&self) -> Result<(), AppError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Validation error: {}",
                problems.join("; ")
            )))
        }
    }
}

/// Push a "required" problem when `value` is blank.
pub(crate) fn require(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("{} is required", field));
    }
}

/// Deserialize an explicit `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
