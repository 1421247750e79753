//! Blog post endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;

use super::{ApiResult, MessageResponse, ValidatedJson};
use crate::auth;
use crate::errors::AppError;
use crate::models::{BlogPost, CreatePostRequest, UpdatePostRequest};
use crate::AppState;

/// Query string for the public listing.
#[derive(Debug, Default, Deserialize)]
pub struct PostsQuery {
    pub published: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl PostsQuery {
    fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|s| !s.is_empty())
    }

    /// Only the literal `false` lists drafts too.
    fn include_drafts(&self) -> bool {
        self.published.as_deref() == Some("false")
    }
}

fn post_not_found() -> AppError {
    AppError::NotFound("Blog post not found".to_string())
}

/// GET /api/blog/posts - Search beats category beats the published flag.
pub async fn list_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PostsQuery>,
) -> ApiResult<Json<Vec<BlogPost>>> {
    if let Some(search) = query.search() {
        return Ok(Json(state.store.search_posts(search).await));
    }
    if let Some(category) = query.category() {
        return Ok(Json(state.store.get_posts_by_category(category).await));
    }
    if query.include_drafts() {
        if !auth::is_admin(&headers, state.config.admin_token.as_deref()) {
            return Err(AppError::Unauthorized(
                "Listing unpublished posts requires admin credentials".to_string(),
            ));
        }
        return Ok(Json(state.store.get_all_posts(Some(false)).await));
    }
    Ok(Json(state.store.get_all_posts(Some(true)).await))
}

/// GET /api/blog/featured - Published featured posts.
pub async fn list_featured(State(state): State<AppState>) -> Json<Vec<BlogPost>> {
    Json(state.store.get_featured_posts().await)
}

/// GET /api/blog/post/{slug} - Public post page; counts a view.
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<BlogPost>> {
    let mut post = state
        .store
        .get_post_by_slug(&slug)
        .await
        .ok_or_else(post_not_found)?;
    if !post.published {
        return Err(AppError::NotFound("Blog post not published".to_string()));
    }

    match state.store.increment_view_count(&post.id).await {
        Ok(true) => {
            if let Some(updated) = state.store.get_post(&post.id).await {
                post = updated;
            }
        }
        Ok(false) => {}
        Err(e) => tracing::warn!("Failed to record view for {}: {}", post.slug, e),
    }

    Ok(Json(post))
}

/// GET /api/blog/categories - Distinct categories of published posts.
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.get_categories().await)
}

/// GET /api/blog/admin/post/{id} - Any post by id, drafts included.
pub async fn get_admin_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BlogPost>> {
    state
        .store
        .get_post(&id)
        .await
        .map(Json)
        .ok_or_else(post_not_found)
}

/// GET /api/blog/admin/posts - Every post, drafts included.
pub async fn list_admin_posts(State(state): State<AppState>) -> Json<Vec<BlogPost>> {
    Json(state.store.get_all_posts(Some(false)).await)
}

/// POST /api/blog/posts
pub async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<BlogPost>)> {
    let post = state.store.create_post(request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/blog/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<BlogPost>> {
    state
        .store
        .update_post(&id, request)
        .await?
        .map(Json)
        .ok_or_else(post_not_found)
}

/// DELETE /api/blog/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.store.delete_post(&id).await? {
        return Err(post_not_found());
    }
    Ok(Json(MessageResponse::new("Blog post deleted successfully")))
}
