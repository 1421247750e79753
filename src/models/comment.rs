//! Blog comment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};

/// Rating given when the commenter leaves none.
pub const DEFAULT_RATING: &str = "5";

/// A reader comment on a post. Hidden from the public until approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogComment {
    pub id: String,
    pub blog_post_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
    /// "1" through "5"
    pub rating: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for submitting a comment. The post id comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub rating: Option<String>,
}

impl Validate for CreateCommentRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        require(&mut problems, "name", &self.name);
        require(&mut problems, "email", &self.email);
        if !self.email.trim().is_empty() && !looks_like_email(&self.email) {
            problems.push("email must be a valid email address".to_string());
        }
        require(&mut problems, "comment", &self.comment);
        if let Some(rating) = &self.rating {
            if !matches!(rating.trim().parse::<u8>(), Ok(1..=5)) {
                problems.push("rating must be between 1 and 5".to_string());
            }
        }
        problems
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, rating: Option<&str>) -> CreateCommentRequest {
        CreateCommentRequest {
            name: "Ada".to_string(),
            email: email.to_string(),
            comment: "Great tips".to_string(),
            rating: rating.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_comment() {
        assert!(request("ada@example.com", None).validate().is_ok());
        assert!(request("ada@example.com", Some("1")).validate().is_ok());
    }

    #[test]
    fn test_rating_bounds() {
        assert_eq!(request("ada@example.com", Some("0")).problems().len(), 1);
        assert_eq!(request("ada@example.com", Some("6")).problems().len(), 1);
        assert_eq!(request("ada@example.com", Some("five")).problems().len(), 1);
    }

    #[test]
    fn test_email_shape() {
        assert!(request("ada", None).validate().is_err());
        assert!(request("ada@localhost", None).validate().is_err());
        assert!(request("@example.com", None).validate().is_err());
    }
}
