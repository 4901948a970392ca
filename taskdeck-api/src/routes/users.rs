/// User directory endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - register a new user (public)
/// - `GET /v1/users` - list users
/// - `GET /v1/users/:id` - fetch one user
/// - `PATCH /v1/users/:id` - partial update (name and/or email)
/// - `DELETE /v1/users/:id` - delete, blocked while tasks/comments remain
///
/// Registration hashes the password before anything is persisted; no
/// plaintext password is stored or logged anywhere in this flow. All
/// responses carry the public projection only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::password,
    error::StoreError,
    models::user::{CreateUser, PublicUser, UpdateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password; hashed before persisting
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Deletion response: confirmation plus the removed record
#[derive(Debug, Serialize)]
pub struct DeletedUserResponse {
    /// Confirmation message
    pub message: String,

    /// The deleted user (public projection)
    pub deleted_user: PublicUser,
}

/// Register a new user
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: validation failed
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<PublicUser>> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await
    .map_err(|e| match e {
        StoreError::UniqueViolation(_) => {
            ApiError::Conflict("Email already registered".to_string())
        }
        other => other.into(),
    })?;

    Ok(Json(user))
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicUser>>> {
    let users = User::list(&state.db).await?;
    Ok(Json(users))
}

/// Fetch a single user
///
/// # Errors
///
/// - `404 Not Found`: no user with that ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user))
}

/// Partially update a user
///
/// Only fields present in the payload change. An empty payload is
/// rejected: a user update must name at least one field.
///
/// # Errors
///
/// - `400 Bad Request`: empty payload
/// - `404 Not Found`: no user with that ID
/// - `409 Conflict`: new email belongs to another user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateUser>,
) -> ApiResult<Json<PublicUser>> {
    if patch.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field (name or email) must be provided".to_string(),
        ));
    }

    let user = User::update(&state.db, id, patch)
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => {
                ApiError::Conflict("Email already registered to another user".to_string())
            }
            other => other.into(),
        })?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user))
}

/// Delete a user
///
/// # Errors
///
/// - `404 Not Found`: no user with that ID
/// - `409 Conflict`: user still referenced by tasks or comments
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedUserResponse>> {
    let user = User::delete(&state.db, id)
        .await
        .map_err(|e| match e {
            // Delete direction: the FK violation means dependents remain
            StoreError::ForeignKeyViolation(_) => ApiError::Conflict(
                "User cannot be deleted while they still own tasks or comments".to_string(),
            ),
            other => other.into(),
        })?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(DeletedUserResponse {
        message: "User deleted".to_string(),
        deleted_user: user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());

        let empty_name = RegisterRequest {
            name: String::new(),
            email: "jane@example.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }
}
