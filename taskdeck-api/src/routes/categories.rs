/// Category endpoints
///
/// # Endpoints
///
/// - `POST /v1/categories` - create a category
/// - `GET /v1/categories` - list categories
/// - `GET /v1/categories/:id` - fetch one category
/// - `PATCH /v1/categories/:id` - partial update (coalesce semantics)
/// - `DELETE /v1/categories/:id` - delete
///
/// The color format (6 hex digits) is enforced here at the boundary; the
/// repository trusts payloads that reach it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use taskdeck_shared::models::category::{Category, CreateCategory, UpdateCategory};
use uuid::Uuid;
use validator::Validate;

/// Category creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Category name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Category description
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,

    /// Display color, 6 hex digits (e.g. "ff8800")
    pub color: String,
}

/// Validates a 6-hex-digit color string
///
/// Matches `^[a-fA-F0-9]{6}$`.
pub fn validate_color(color: &str) -> Result<(), String> {
    if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Color must be exactly 6 hexadecimal digits".to_string());
    }
    Ok(())
}

fn color_error(message: String) -> ApiError {
    ApiError::ValidationError(vec![ValidationErrorDetail {
        field: "color".to_string(),
        message,
    }])
}

/// Create a category
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed (e.g. malformed color)
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<Json<Category>> {
    req.validate()?;
    validate_color(&req.color).map_err(color_error)?;

    let category = Category::create(
        &state.db,
        CreateCategory {
            name: req.name,
            description: req.description,
            color: req.color,
        },
    )
    .await?;

    Ok(Json(category))
}

/// List all categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = Category::list(&state.db).await?;
    Ok(Json(categories))
}

/// Fetch a single category
///
/// # Errors
///
/// - `404 Not Found`: no category with that ID
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Category>> {
    let category = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", id)))?;

    Ok(Json(category))
}

/// Partially update a category
///
/// Only fields present in the payload change; an empty payload falls back
/// to returning the current category.
///
/// # Errors
///
/// - `404 Not Found`: no category with that ID
/// - `422 Unprocessable Entity`: malformed color
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateCategory>,
) -> ApiResult<Json<Category>> {
    if let Some(ref color) = patch.color {
        validate_color(color).map_err(color_error)?;
    }

    if patch.is_empty() {
        // Nothing to change: behave like a fetch
        let category = Category::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", id)))?;
        return Ok(Json(category));
    }

    let category = Category::update(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", id)))?;

    Ok(Json(category))
}

/// Delete a category
///
/// # Errors
///
/// - `404 Not Found`: no category with that ID
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Category>> {
    let category = Category::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", id)))?;

    Ok(Json(category))
}
