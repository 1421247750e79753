//! On-disk snapshot of the whole content store.

use serde::{Deserialize, Serialize};

use super::{BlogComment, BlogPost, UserRecord};

/// The JSON document written on every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Plain records, or `[id, record]` pairs as older files have them.
    #[serde(default, deserialize_with = "user_entries::deserialize")]
    pub users: Vec<UserRecord>,
    /// `None` when the document has no `blogPosts` key; the store seeds in that case.
    #[serde(default)]
    pub blog_posts: Option<Vec<BlogPost>>,
    #[serde(default)]
    pub blog_comments: Vec<BlogComment>,
}

mod user_entries {
    use super::*;
    use serde::Deserializer;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Record(UserRecord),
        Pair(String, UserRecord),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<UserRecord>, D::Error> {
        let entries = Option::<Vec<Entry>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(entries
            .into_iter()
            .map(|entry| match entry {
                Entry::Record(record) => record,
                Entry::Pair(id, mut record) => {
                    if record.id.is_empty() {
                        record.id = id;
                    }
                    record
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_paired_users_and_null_tags() {
        let raw = r#"{
            "users": [["u1", {"id": "u1", "username": "admin", "password": "pw"}]],
            "blogPosts": [{
                "id": "p1", "title": "Mine", "slug": "mine", "excerpt": "e",
                "content": "c", "metaDescription": "m", "keywords": "k",
                "ogImage": null, "author": "Me", "category": "Notes", "tags": null,
                "published": true, "featured": false,
                "publishedAt": "2024-08-01T10:00:00.000Z",
                "createdAt": "2024-08-01T10:00:00.000Z",
                "updatedAt": "2024-08-01T10:00:00.000Z"
            }],
            "blogComments": []
        }"#;

        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.users[0].username, "admin");
        assert_eq!(snapshot.users[0].password.as_deref(), Some("pw"));
        assert!(snapshot.users[0].password_hash.is_none());

        let posts = snapshot.blog_posts.unwrap();
        assert_eq!(posts[0].slug, "mine");
        assert!(posts[0].tags.is_empty());
        assert_eq!(posts[0].view_count, 0);
    }

    #[test]
    fn test_reads_plain_user_records() {
        let raw = r#"{"users": [{
            "id": "u2", "username": "editor",
            "passwordHash": "$argon2id$x", "createdAt": "2025-01-01T00:00:00Z"
        }]}"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.users[0].id, "u2");
        assert_eq!(snapshot.users[0].password_hash.as_deref(), Some("$argon2id$x"));
        assert!(snapshot.blog_posts.is_none());
    }

    #[test]
    fn test_plaintext_password_is_never_written() {
        let mut record = UserRecord {
            id: "u1".to_string(),
            username: "admin".to_string(),
            password_hash: Some("$argon2id$x".to_string()),
            password: Some("pw".to_string()),
            created_at: None,
        };
        let json = serde_json::to_value(Snapshot {
            users: vec![record.clone()],
            ..Default::default()
        })
        .unwrap();
        assert!(json["users"][0].get("password").is_none());

        record.password_hash = None;
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("passwordHash").is_none());
    }
}
