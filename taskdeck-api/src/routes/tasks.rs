/// Task endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - create a task (always starts pending)
/// - `GET /v1/tasks` - list tasks, filterable, enriched
/// - `GET /v1/tasks/:id` - fetch one task, enriched
/// - `PATCH /v1/tasks/:id` - partial update (coalesce semantics)
/// - `DELETE /v1/tasks/:id` - delete
/// - `POST /v1/tasks/:id/categories` - batch-associate categories
/// - `GET /v1/tasks/:id/categories/unassociated` - categories not yet linked
///
/// Creation takes the creator from the authenticated subject, never from
/// the payload. A `status` field in the creation payload is dropped at
/// deserialization; new tasks always start pending.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use taskdeck_shared::{
    auth::middleware::AuthContext,
    models::{
        category::{Category, CategoryRef},
        task::{CreateTask, Task, TaskDetails, TaskFilter, UpdateTask},
        task_category::TaskCategory,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional story-point estimate (defaults to 0)
    pub story_points: Option<i32>,

    /// Optional delivery date
    pub delivery_date: Option<NaiveDate>,

    /// User the task is assigned to
    pub assignee_id: Uuid,
}

/// Category association request (batch form)
#[derive(Debug, Deserialize, Validate)]
pub struct AssociateCategoriesRequest {
    /// Categories to link to the task
    #[validate(length(min = 1, message = "At least one category ID is required"))]
    pub category_ids: Vec<Uuid>,
}

/// Rejects a negative story-point estimate
///
/// Shared by create and update; absent estimates pass.
fn check_story_points(story_points: Option<i32>) -> ApiResult<()> {
    if let Some(points) = story_points {
        if points < 0 {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "story_points".to_string(),
                message: "Story points cannot be negative".to_string(),
            }]));
        }
    }
    Ok(())
}

/// Create a task
///
/// # Errors
///
/// - `400 Bad Request`: assignee does not exist
/// - `422 Unprocessable Entity`: validation failed, negative story points
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;
    check_story_points(req.story_points)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            name: req.name,
            description: req.description,
            story_points: req.story_points,
            delivery_date: req.delivery_date,
            assignee_id: req.assignee_id,
        },
        auth.user_id,
    )
    .await?;

    tracing::info!(task_id = %task.id, creator_id = %auth.user_id, "Task created");

    Ok(Json(task))
}

/// List tasks, enriched, with optional conjunctive filters
///
/// Query parameters: `status`, `assigned_to`, `creator_id`. Results are
/// ordered by delivery date ascending; undated tasks sort last.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<TaskDetails>>> {
    let tasks = Task::list(&state.db, filter).await?;
    Ok(Json(tasks))
}

/// Fetch a single task, enriched
///
/// # Errors
///
/// - `404 Not Found`: no task with that ID
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetails>> {
    let task = Task::find_details(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Partially update a task
///
/// Only fields present in the payload change; an empty payload returns
/// the current task unchanged.
///
/// # Errors
///
/// - `404 Not Found`: no task with that ID
/// - `422 Unprocessable Entity`: negative story points
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    check_story_points(patch.story_points)?;

    let task = Task::update(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: no task with that ID
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Associate a batch of categories with a task
///
/// Idempotent: pairs that already exist are silently skipped, and the
/// response lists only the associations created by this call.
///
/// # Errors
///
/// - `400 Bad Request`: task or a category does not exist
/// - `422 Unprocessable Entity`: empty category list
pub async fn associate_categories(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<AssociateCategoriesRequest>,
) -> ApiResult<Json<Vec<TaskCategory>>> {
    req.validate()?;

    let associations = TaskCategory::associate(&state.db, task_id, &req.category_ids).await?;

    Ok(Json(associations))
}

/// List categories not yet linked to a task
pub async fn list_unassociated_categories(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CategoryRef>>> {
    let categories = Category::list_unassociated(&state.db, task_id).await?;
    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_story_points_rejects_negative() {
        let err = check_story_points(Some(-1)).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn test_check_story_points_accepts_zero_and_absent() {
        assert!(check_story_points(Some(0)).is_ok());
        assert!(check_story_points(Some(5)).is_ok());
        assert!(check_story_points(None).is_ok());
    }

    #[test]
    fn test_create_task_request_drops_client_status() {
        // A status field in the payload is not part of the request type,
        // so it can never influence the stored status.
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{
                "name": "Ship login flow",
                "assignee_id": "550e8400-e29b-41d4-a716-446655440000",
                "status": "done"
            }"#,
        )
        .unwrap();

        assert_eq!(req.name, "Ship login flow");
        assert!(req.story_points.is_none());
    }

    #[test]
    fn test_associate_categories_request_requires_ids() {
        let empty = AssociateCategoriesRequest {
            category_ids: vec![],
        };
        assert!(empty.validate().is_err());

        let one = AssociateCategoriesRequest {
            category_ids: vec![Uuid::new_v4()],
        };
        assert!(one.validate().is_ok());
    }
}
