/// Comment model and database operations
///
/// Comments belong to a task and an author; both references are fixed at
/// creation and only the content is mutable afterwards. The creation
/// timestamp comes from the server clock (the handler passes it in), never
/// from client input.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     author_id UUID NOT NULL REFERENCES users(id),
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

/// Comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Task this comment belongs to
    pub task_id: Uuid,

    /// User who wrote the comment
    pub author_id: Uuid,

    /// Comment text
    pub content: String,

    /// When the comment was created (server clock)
    pub created_at: DateTime<Utc>,
}

/// Minimal comment reference (id + content), used in task aggregation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentRef {
    /// Comment ID
    pub id: Uuid,

    /// Comment text
    pub content: String,
}

/// Input for creating a new comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    /// Task to attach the comment to
    pub task_id: Uuid,

    /// Comment text
    pub content: String,
}

impl Comment {
    /// Creates a new comment
    ///
    /// `author_id` comes from the authenticated subject and `created_at`
    /// from the server clock; neither is taken from the request payload.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ForeignKeyViolation` when the referenced task
    /// or author does not exist.
    pub async fn create(
        pool: &PgPool,
        data: CreateComment,
        author_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, task_id, author_id, content, created_at
            "#,
        )
        .bind(data.task_id)
        .bind(author_id)
        .bind(data.content)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Lists all comments, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, StoreError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, author_id, content, created_at
            FROM comments
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, author_id, content, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Updates a comment's content
    ///
    /// Task and author references stay immutable. Returns `Ok(None)` when
    /// no row matched.
    pub async fn update_content(
        pool: &PgPool,
        id: Uuid,
        content: String,
    ) -> Result<Option<Self>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2
            WHERE id = $1
            RETURNING id, task_id, author_id, content, created_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Deletes a comment, returning the deleted row
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            DELETE FROM comments
            WHERE id = $1
            RETURNING id, task_id, author_id, content, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }
}
