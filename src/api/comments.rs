//! Comment submission and moderation endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::{ApiResult, MessageResponse, ValidatedJson};
use crate::errors::AppError;
use crate::models::{BlogComment, CreateCommentRequest};
use crate::AppState;

/// Response for a newly submitted comment.
#[derive(Debug, Serialize)]
pub struct CommentCreatedResponse {
    pub message: String,
    pub comment: BlogComment,
}

fn comment_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Comment {} not found", id))
}

/// GET /api/blog/posts/{id}/comments - Approved comments only.
pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Json<Vec<BlogComment>> {
    Json(state.store.get_comments_by_post(&post_id).await)
}

/// POST /api/blog/posts/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentCreatedResponse>)> {
    let comment = state.store.create_comment(&post_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentCreatedResponse {
            message: "Comment submitted successfully and is awaiting moderation".to_string(),
            comment,
        }),
    ))
}

/// GET /api/blog/admin/comments - Every comment, approved or not.
pub async fn list_all_comments(State(state): State<AppState>) -> Json<Vec<BlogComment>> {
    Json(state.store.get_all_comments().await)
}

/// PUT /api/blog/comments/{id}/approve
pub async fn approve_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.store.approve_comment(&id).await? {
        return Err(comment_not_found(&id));
    }
    Ok(Json(MessageResponse::new("Comment approved successfully")))
}

/// DELETE /api/blog/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.store.delete_comment(&id).await? {
        return Err(comment_not_found(&id));
    }
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}
