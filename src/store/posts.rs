//! Post queries and mutations.

use std::collections::HashSet;

use chrono::Utc;

use super::ContentStore;
use crate::errors::AppError;
use crate::models::{BlogPost, CreatePostRequest, UpdatePostRequest, DEFAULT_AUTHOR};

/// Newest first by publish date, falling back to creation date.
fn sort_newest_first(mut posts: Vec<BlogPost>) -> Vec<BlogPost> {
    posts.sort_by(|a, b| {
        b.sort_key()
            .cmp(&a.sort_key())
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    posts
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn slug_taken_error(slug: &str) -> AppError {
    AppError::Conflict(format!("Blog post with slug \"{}\" already exists", slug))
}

impl ContentStore {
    /// Posts in listing order. `None` and `Some(true)` list published posts
    /// only; `Some(false)` lists drafts too.
    pub async fn get_all_posts(&self, published_only: Option<bool>) -> Vec<BlogPost> {
        let published_only = published_only.unwrap_or(true);
        let data = self.data.read().await;
        let posts = data
            .posts
            .values()
            .filter(|p| !published_only || p.published)
            .cloned()
            .collect();
        sort_newest_first(posts)
    }

    pub async fn get_post(&self, id: &str) -> Option<BlogPost> {
        self.data.read().await.posts.get(id).cloned()
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Option<BlogPost> {
        self.data
            .read()
            .await
            .posts
            .values()
            .find(|p| p.slug == slug)
            .cloned()
    }

    /// Create a post. Fails with a conflict when the slug is taken.
    pub async fn create_post(&self, request: CreatePostRequest) -> Result<BlogPost, AppError> {
        let slug = request.slug.trim().to_string();
        let mut data = self.data.write().await;

        if data.posts.values().any(|p| p.slug == slug) {
            return Err(slug_taken_error(&slug));
        }

        let now = Utc::now();
        let published = request.published.unwrap_or(false);
        let post = BlogPost {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.title.trim().to_string(),
            slug,
            excerpt: request.excerpt,
            content: request.content,
            meta_description: request.meta_description,
            keywords: request.keywords,
            og_image: non_empty(request.og_image),
            author: non_empty(request.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            category: request.category.trim().to_string(),
            tags: request.tags.unwrap_or_default(),
            published,
            featured: request.featured.unwrap_or(false),
            view_count: 0,
            published_at: published.then_some(now),
            created_at: now,
            updated_at: now,
        };

        self.commit(&mut data, |next| {
            next.posts.insert(post.id.clone(), post.clone());
        })
        .await?;

        tracing::info!("Created post {} ({})", post.id, post.slug);
        Ok(post)
    }

    /// Merge the provided fields into a post. `Ok(None)` when the id is unknown.
    pub async fn update_post(
        &self,
        id: &str,
        request: UpdatePostRequest,
    ) -> Result<Option<BlogPost>, AppError> {
        let mut data = self.data.write().await;

        let Some(existing) = data.posts.get(id) else {
            return Ok(None);
        };
        let mut post = existing.clone();

        if let Some(slug) = request.slug {
            let slug = slug.trim().to_string();
            if data.posts.values().any(|p| p.id != id && p.slug == slug) {
                return Err(slug_taken_error(&slug));
            }
            post.slug = slug;
        }
        if let Some(title) = request.title {
            post.title = title.trim().to_string();
        }
        if let Some(excerpt) = request.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = request.content {
            post.content = content;
        }
        if let Some(meta_description) = request.meta_description {
            post.meta_description = meta_description;
        }
        if let Some(keywords) = request.keywords {
            post.keywords = keywords;
        }
        if let Some(og_image) = request.og_image {
            post.og_image = non_empty(Some(og_image));
        }
        if let Some(author) = request.author {
            post.author = author.trim().to_string();
        }
        if let Some(category) = request.category {
            post.category = category.trim().to_string();
        }
        if let Some(tags) = request.tags {
            post.tags = tags;
        }
        if let Some(featured) = request.featured {
            post.featured = featured;
        }

        let now = Utc::now();
        if let Some(published) = request.published {
            if published && !post.published && post.published_at.is_none() {
                post.published_at = Some(now);
            }
            post.published = published;
        }
        post.updated_at = now;

        self.commit(&mut data, |next| {
            next.posts.insert(post.id.clone(), post.clone());
        })
        .await?;

        tracing::info!("Updated post {} ({})", post.id, post.slug);
        Ok(Some(post))
    }

    /// Remove a post. Its comments stay, as nothing enforces the relation.
    pub async fn delete_post(&self, id: &str) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        if !data.posts.contains_key(id) {
            return Ok(false);
        }
        self.commit(&mut data, |next| next.posts.remove(id)).await?;

        tracing::info!("Deleted post {}", id);
        Ok(true)
    }

    pub async fn get_featured_posts(&self) -> Vec<BlogPost> {
        let data = self.data.read().await;
        let posts = data
            .posts
            .values()
            .filter(|p| p.published && p.featured)
            .cloned()
            .collect();
        sort_newest_first(posts)
    }

    pub async fn get_posts_by_category(&self, category: &str) -> Vec<BlogPost> {
        let data = self.data.read().await;
        let posts = data
            .posts
            .values()
            .filter(|p| p.published && p.category == category)
            .cloned()
            .collect();
        sort_newest_first(posts)
    }

    /// Linear case-insensitive scan over published posts.
    pub async fn search_posts(&self, query: &str) -> Vec<BlogPost> {
        let needle = query.to_lowercase();
        let data = self.data.read().await;
        let posts = data
            .posts
            .values()
            .filter(|p| p.published && p.matches(&needle))
            .cloned()
            .collect();
        sort_newest_first(posts)
    }

    /// Distinct categories of published posts, in listing order.
    pub async fn get_categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.get_all_posts(Some(true))
            .await
            .into_iter()
            .filter_map(|p| seen.insert(p.category.clone()).then_some(p.category))
            .collect()
    }

    /// Bump the view counter. Returns false when the id is unknown.
    pub async fn increment_view_count(&self, id: &str) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        if !data.posts.contains_key(id) {
            return Ok(false);
        }
        self.commit(&mut data, |next| {
            if let Some(post) = next.posts.get_mut(id) {
                post.view_count = post.view_count.saturating_add(1);
            }
        })
        .await?;
        Ok(true)
    }
}
