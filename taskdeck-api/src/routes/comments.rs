/// Comment endpoints
///
/// # Endpoints
///
/// - `POST /v1/comments` - create a comment on a task
/// - `GET /v1/comments` - list comments
/// - `GET /v1/comments/:id` - fetch one comment
/// - `PATCH /v1/comments/:id` - update content
/// - `DELETE /v1/comments/:id` - delete
///
/// The author comes from the authenticated subject and the timestamp from
/// the server clock; neither is trusted from the payload.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use taskdeck_shared::{
    auth::middleware::AuthContext,
    models::comment::{Comment, CreateComment},
};
use uuid::Uuid;
use validator::Validate;

/// Comment creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Task to attach the comment to
    pub task_id: Uuid,

    /// Comment text
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

/// Comment update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    /// New comment text
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: Option<String>,
}

/// Create a comment
///
/// # Errors
///
/// - `400 Bad Request`: referenced task does not exist
/// - `422 Unprocessable Entity`: validation failed
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate()?;

    let comment = Comment::create(
        &state.db,
        CreateComment {
            task_id: req.task_id,
            content: req.content,
        },
        auth.user_id,
        Utc::now(),
    )
    .await?;

    Ok(Json(comment))
}

/// List all comments
pub async fn list_comments(State(state): State<AppState>) -> ApiResult<Json<Vec<Comment>>> {
    let comments = Comment::list(&state.db).await?;
    Ok(Json(comments))
}

/// Fetch a single comment
///
/// # Errors
///
/// - `404 Not Found`: no comment with that ID
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Comment>> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    Ok(Json(comment))
}

/// Update a comment's content
///
/// Task and author references are immutable; only the content changes.
/// An empty payload falls back to returning the current comment.
///
/// # Errors
///
/// - `404 Not Found`: no comment with that ID
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate()?;

    let comment = match req.content {
        Some(content) => Comment::update_content(&state.db, id, content).await?,
        None => Comment::find_by_id(&state.db, id).await?,
    }
    .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    Ok(Json(comment))
}

/// Delete a comment
///
/// # Errors
///
/// - `404 Not Found`: no comment with that ID
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Comment>> {
    let comment = Comment::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", id)))?;

    Ok(Json(comment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_request_validation() {
        let valid = CreateCommentRequest {
            task_id: Uuid::new_v4(),
            content: "looks good".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateCommentRequest {
            task_id: Uuid::new_v4(),
            content: String::new(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_create_comment_request_has_no_author_field() {
        // Author and timestamp are server-assigned; a payload naming them
        // deserializes without effect.
        let req: CreateCommentRequest = serde_json::from_str(
            r#"{
                "task_id": "550e8400-e29b-41d4-a716-446655440000",
                "content": "first",
                "author_id": "00000000-0000-0000-0000-000000000000",
                "created_at": "1999-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(req.content, "first");
    }
}
