/// Task model and database operations
///
/// Tasks are the core entity: each carries a creator and an assignee (both
/// users), an optional story-point estimate, an optional delivery date,
/// and a free-form status string. Every new task starts in the pending
/// status regardless of what the client supplied.
///
/// Reads come in two shapes: the bare row ([`Task`]) and the enriched
/// projection ([`TaskDetails`]) that rolls up the assignee/creator names
/// plus the associated categories and comments in one statement.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     story_points INTEGER NOT NULL DEFAULT 0 CHECK (story_points >= 0),
///     delivery_date DATE,
///     status VARCHAR(50) NOT NULL DEFAULT 'pending',
///     creator_id UUID NOT NULL REFERENCES users(id),
///     assignee_id UUID NOT NULL REFERENCES users(id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task, TaskFilter};
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool, creator: Uuid, assignee: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let task = Task::create(&pool, CreateTask {
///     name: "Ship login flow".to_string(),
///     description: None,
///     story_points: Some(5),
///     delivery_date: None,
///     assignee_id: assignee,
/// }, creator).await?;
///
/// let open = Task::list(&pool, TaskFilter {
///     status: Some("pending".to_string()),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::category::CategoryRef;
use crate::models::comment::CommentRef;

/// Status assigned to every newly created task
pub const PENDING_STATUS: &str = "pending";

/// Task model (bare row, no aggregation)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task name
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Story-point estimate, always >= 0
    pub story_points: i32,

    /// Optional delivery date
    pub delivery_date: Option<NaiveDate>,

    /// Free-form status string; new tasks always start as "pending"
    pub status: String,

    /// User who created the task
    pub creator_id: Uuid,

    /// User the task is assigned to
    pub assignee_id: Uuid,
}

/// Task enriched with assignee/creator names and nested category and
/// comment references
///
/// `categories` and `comments` are always present; a task with no links
/// carries empty arrays, never null.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskDetails {
    /// Unique task ID
    pub id: Uuid,

    /// Task name
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Story-point estimate
    pub story_points: i32,

    /// Optional delivery date
    pub delivery_date: Option<NaiveDate>,

    /// Current status
    pub status: String,

    /// User who created the task
    pub creator_id: Uuid,

    /// User the task is assigned to
    pub assignee_id: Uuid,

    /// Display name of the creator
    pub creator_name: Option<String>,

    /// Display name of the assignee
    pub assignee_name: Option<String>,

    /// Categories linked to this task
    pub categories: Json<Vec<CategoryRef>>,

    /// Comments on this task
    pub comments: Json<Vec<CommentRef>>,
}

/// Input for creating a new task
///
/// Any status supplied by the client is ignored: new tasks always start
/// pending. Absent story points default to 0.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task name
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

/// Partial update for a task
///
/// Absent fields keep their stored value. The creator reference is fixed
/// at creation and not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New story-point estimate
    pub story_points: Option<i32>,

    /// New delivery date
    pub delivery_date: Option<NaiveDate>,

    /// New status
    pub status: Option<String>,

    /// New assignee
    pub assignee_id: Option<Uuid>,
}

impl UpdateTask {
    /// True when the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.story_points.is_none()
            && self.delivery_date.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
    }
}

/// Conjunctive listing filters; each is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Only tasks with this status
    pub status: Option<String>,

    /// Only tasks assigned to this user
    pub assigned_to: Option<Uuid>,

    /// Only tasks created by this user
    pub creator_id: Option<Uuid>,
}

/// Shared SELECT body for the enriched task projection
///
/// The category and comment roll-ups are correlated subselects folded to
/// `'[]'` when empty, so consumers always see arrays.
const DETAILS_SELECT: &str = r#"
    SELECT t.id, t.name, t.description, t.story_points, t.delivery_date, t.status,
           t.creator_id, t.assignee_id,
           u_creator.name AS creator_name,
           u_assign.name AS assignee_name,
           COALESCE(
               (SELECT json_agg(json_build_object('id', c.id, 'name', c.name))
                FROM task_categories tc
                JOIN categories c ON c.id = tc.category_id
                WHERE tc.task_id = t.id),
               '[]'::json
           ) AS categories,
           COALESCE(
               (SELECT json_agg(json_build_object('id', m.id, 'content', m.content))
                FROM comments m
                WHERE m.task_id = t.id),
               '[]'::json
           ) AS comments
    FROM tasks t
    LEFT JOIN users u_creator ON u_creator.id = t.creator_id
    LEFT JOIN users u_assign ON u_assign.id = t.assignee_id
"#;

impl Task {
    /// Creates a new task in pending status
    ///
    /// The status is fixed server-side; story points default to 0 when
    /// absent. Negative story points are rejected at the boundary before
    /// this runs, and the schema CHECK backs that up.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ForeignKeyViolation` when the assignee does
    /// not exist.
    pub async fn create(
        pool: &PgPool,
        data: CreateTask,
        creator_id: Uuid,
    ) -> Result<Self, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (name, description, story_points, delivery_date, status, creator_id, assignee_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, story_points, delivery_date, status, creator_id, assignee_id
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.story_points.unwrap_or(0))
        .bind(data.delivery_date)
        .bind(PENDING_STATUS)
        .bind(creator_id)
        .bind(data.assignee_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks matching the filter, enriched
    ///
    /// Filters are conjunctive and each optional. Results are ordered by
    /// delivery date ascending; tasks without a delivery date sort last
    /// (Postgres default for ASC).
    pub async fn list(pool: &PgPool, filter: TaskFilter) -> Result<Vec<TaskDetails>, StoreError> {
        let query = format!(
            r#"{DETAILS_SELECT}
            WHERE ($1::text IS NULL OR t.status = $1)
              AND ($2::uuid IS NULL OR t.assignee_id = $2)
              AND ($3::uuid IS NULL OR t.creator_id = $3)
            ORDER BY t.delivery_date ASC
            "#
        );

        let tasks = sqlx::query_as::<_, TaskDetails>(&query)
            .bind(filter.status)
            .bind(filter.assigned_to)
            .bind(filter.creator_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Finds a task by ID, enriched
    pub async fn find_details(pool: &PgPool, id: Uuid) -> Result<Option<TaskDetails>, StoreError> {
        let query = format!("{DETAILS_SELECT} WHERE t.id = $1");

        let task = sqlx::query_as::<_, TaskDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Applies a partial update to a task
    ///
    /// Fields absent from the patch keep their stored value; one atomic
    /// statement, no read-then-write. An empty patch degenerates to a
    /// no-op that returns the current row. Returns `Ok(None)` when no row
    /// matched.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                story_points = COALESCE($4, story_points),
                delivery_date = COALESCE($5, delivery_date),
                status = COALESCE($6, status),
                assignee_id = COALESCE($7, assignee_id)
            WHERE id = $1
            RETURNING id, name, description, story_points, delivery_date, status, creator_id, assignee_id
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.story_points)
        .bind(data.delivery_date)
        .bind(data.status)
        .bind(data.assignee_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task, returning the deleted row
    ///
    /// Association rows and comments are removed by the store's cascade
    /// rules. Returns `Ok(None)` when no row matched.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE id = $1
            RETURNING id, name, description, story_points, delivery_date, status, creator_id, assignee_id
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
