//! Comment queries and moderation.

use chrono::Utc;

use super::ContentStore;
use crate::errors::AppError;
use crate::models::{BlogComment, CreateCommentRequest, DEFAULT_RATING};

fn newest_first(mut comments: Vec<BlogComment>) -> Vec<BlogComment> {
    comments.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    comments
}

impl ContentStore {
    /// Approved comments of one post, newest first.
    pub async fn get_comments_by_post(&self, post_id: &str) -> Vec<BlogComment> {
        let data = self.data.read().await;
        let comments = data
            .comments
            .values()
            .filter(|c| c.blog_post_id == post_id && c.approved)
            .cloned()
            .collect();
        newest_first(comments)
    }

    /// Every comment regardless of approval, newest first.
    pub async fn get_all_comments(&self) -> Vec<BlogComment> {
        let data = self.data.read().await;
        newest_first(data.comments.values().cloned().collect())
    }

    /// Store a new comment. It stays hidden until approved.
    pub async fn create_comment(
        &self,
        post_id: &str,
        request: CreateCommentRequest,
    ) -> Result<BlogComment, AppError> {
        let comment = BlogComment {
            id: uuid::Uuid::new_v4().to_string(),
            blog_post_id: post_id.to_string(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            comment: request.comment,
            rating: request
                .rating
                .map(|r| r.trim().to_string())
                .unwrap_or_else(|| DEFAULT_RATING.to_string()),
            approved: false,
            created_at: Utc::now(),
        };

        let mut data = self.data.write().await;
        self.commit(&mut data, |next| {
            next.comments.insert(comment.id.clone(), comment.clone());
        })
        .await?;

        tracing::info!(
            "Comment {} submitted on post {}, awaiting moderation",
            comment.id,
            post_id
        );
        Ok(comment)
    }

    /// Mark a comment approved. Returns false when the id is unknown.
    pub async fn approve_comment(&self, id: &str) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        if !data.comments.contains_key(id) {
            return Ok(false);
        }
        self.commit(&mut data, |next| {
            if let Some(comment) = next.comments.get_mut(id) {
                comment.approved = true;
            }
        })
        .await?;

        tracing::info!("Approved comment {}", id);
        Ok(true)
    }

    pub async fn delete_comment(&self, id: &str) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        if !data.comments.contains_key(id) {
            return Ok(false);
        }
        self.commit(&mut data, |next| next.comments.remove(id)).await?;

        tracing::info!("Deleted comment {}", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(name: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            comment: "Helpful post".to_string(),
            rating: None,
        }
    }

    #[tokio::test]
    async fn test_new_comment_is_unapproved_with_default_rating() {
        let store = ContentStore::in_memory();
        let comment = store.create_comment("post-1", request("Ada")).await.unwrap();
        assert!(!comment.approved);
        assert_eq!(comment.rating, "5");
        assert!(store.get_comments_by_post("post-1").await.is_empty());
        assert_eq!(store.get_all_comments().await.len(), 1);
    }

    #[tokio::test]
    async fn test_approval_reveals_comments_newest_first() {
        let store = ContentStore::in_memory();
        let first = store.create_comment("post-1", request("Ada")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = store.create_comment("post-1", request("Bob")).await.unwrap();
        store.create_comment("post-2", request("Cy")).await.unwrap();

        assert!(store.approve_comment(&first.id).await.unwrap());
        let visible = store.get_comments_by_post("post-1").await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, first.id);
        assert!(visible[0].approved);

        assert!(store.approve_comment(&second.id).await.unwrap());
        let visible: Vec<String> = store
            .get_comments_by_post("post-1")
            .await
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(visible, vec![second.id, first.id]);

        assert!(!store.approve_comment("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_comment() {
        let store = ContentStore::in_memory();
        let comment = store.create_comment("post-1", request("Ada")).await.unwrap();
        assert!(store.delete_comment(&comment.id).await.unwrap());
        assert!(!store.delete_comment(&comment.id).await.unwrap());
        assert!(store.get_all_comments().await.is_empty());
    }
}
