//! Blog post model and its request bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{null_as_default, require, Validate};

/// Author stamped on posts created without one.
pub const DEFAULT_AUTHOR: &str = "ClipSync Pro Team";

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// Markdown body
    pub content: String,
    pub meta_description: String,
    pub keywords: String,
    #[serde(default)]
    pub og_image: Option<String>,
    pub author: String,
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub published: bool,
    pub featured: bool,
    /// Stored as decimal text in the snapshot and on the wire.
    #[serde(default, with = "view_count_text")]
    pub view_count: u64,
    /// Set on the first transition to published, then never touched again.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Timestamp used for listing order.
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    /// Case-insensitive substring match over the searchable fields.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
            || self.category.to_lowercase().contains(needle)
    }
}

/// Request body for creating a new post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl Validate for CreatePostRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        require(&mut problems, "title", &self.title);
        require(&mut problems, "slug", &self.slug);
        if !self.slug.trim().is_empty() && !is_valid_slug(&self.slug) {
            problems.push(slug_problem(&self.slug));
        }
        require(&mut problems, "excerpt", &self.excerpt);
        require(&mut problems, "content", &self.content);
        require(&mut problems, "metaDescription", &self.meta_description);
        require(&mut problems, "keywords", &self.keywords);
        require(&mut problems, "category", &self.category);
        problems
    }
}

/// Request body for a partial post update. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    /// An empty string clears the image.
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl Validate for UpdatePostRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let required = [
            ("title", &self.title),
            ("excerpt", &self.excerpt),
            ("content", &self.content),
            ("metaDescription", &self.meta_description),
            ("keywords", &self.keywords),
            ("author", &self.author),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    problems.push(format!("{} cannot be empty", field));
                }
            }
        }
        if let Some(slug) = &self.slug {
            if !is_valid_slug(slug) {
                problems.push(slug_problem(slug));
            }
        }
        problems
    }
}

/// Lowercase ASCII words joined by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .split('-')
            .all(|part| {
                !part.is_empty()
                    && part
                        .bytes()
                        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
            })
}

fn slug_problem(slug: &str) -> String {
    format!(
        "slug \"{}\" must contain only lowercase letters, digits and single hyphens",
        slug
    )
}

/// Serde adapter keeping the view counter as text.
mod view_count_text {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(count: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&count.to_string())
    }

    /// Unparsable text counts as zero.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.trim().parse().unwrap_or(0),
            Raw::Number(n) => n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> BlogPost {
        let created = Utc.with_ymd_and_hms(2024, 8, 10, 0, 0, 0).unwrap();
        BlogPost {
            id: "p1".to_string(),
            title: "Clipboard Shortcuts".to_string(),
            slug: "clipboard-shortcuts".to_string(),
            excerpt: "Save time".to_string(),
            content: "# Use Ctrl+Space".to_string(),
            meta_description: "m".to_string(),
            keywords: "k".to_string(),
            og_image: None,
            author: DEFAULT_AUTHOR.to_string(),
            category: "Productivity".to_string(),
            tags: vec!["Power-User".to_string()],
            published: true,
            featured: false,
            view_count: 7,
            published_at: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("hi"));
        assert!(is_valid_slug("linux-clipboard-manager-2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Hello"));
        assert!(!is_valid_slug("two--hyphens"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("has space"));
    }

    #[test]
    fn test_view_count_serializes_as_text() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["viewCount"], "7");
        assert_eq!(json["ogImage"], serde_json::Value::Null);
        assert_eq!(json["publishedAt"], serde_json::Value::Null);
    }

    #[test]
    fn test_view_count_accepts_garbage_and_numbers() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["viewCount"] = serde_json::json!("abc");
        let post: BlogPost = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(post.view_count, 0);

        json["viewCount"] = serde_json::json!(42);
        let post: BlogPost = serde_json::from_value(json).unwrap();
        assert_eq!(post.view_count, 42);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let post = sample();
        assert!(post.matches("shortcuts"));
        assert!(post.matches("ctrl+space"));
        assert!(post.matches("power-user"));
        assert!(post.matches("productiv"));
        assert!(!post.matches("linux"));
    }

    #[test]
    fn test_sort_key_falls_back_to_created_at() {
        let mut post = sample();
        assert_eq!(post.sort_key(), post.created_at);
        let published = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        post.published_at = Some(published);
        assert_eq!(post.sort_key(), published);
    }

    #[test]
    fn test_create_request_reports_all_missing_fields() {
        let request: CreatePostRequest =
            serde_json::from_value(serde_json::json!({ "title": "Hi" })).unwrap();
        let problems = request.problems();
        assert!(problems.contains(&"slug is required".to_string()));
        assert!(problems.contains(&"category is required".to_string()));
        assert!(!problems.iter().any(|p| p.starts_with("title")));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_rejects_blank_and_bad_slug() {
        let request: UpdatePostRequest =
            serde_json::from_value(serde_json::json!({ "title": " ", "slug": "Bad Slug" }))
                .unwrap();
        let problems = request.problems();
        assert_eq!(problems.len(), 2);

        let empty = UpdatePostRequest::default();
        assert!(empty.validate().is_ok());
    }
}
