/// Category model and database operations
///
/// Categories are labels that can be attached to any number of tasks via
/// the `task_categories` association table. The color is a 6-hex-digit
/// string; its format is validated at the HTTP boundary before a payload
/// reaches this module.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL,
///     color VARCHAR(6) NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

/// Category model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID
    pub id: Uuid,

    /// Category name
    pub name: String,

    /// Category description
    pub description: String,

    /// Display color, 6 hex digits (e.g. "ff8800")
    pub color: String,
}

/// Minimal category reference (id + name), used in task aggregation and
/// the unassociated-categories query
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryRef {
    /// Category ID
    pub id: Uuid,

    /// Category name
    pub name: String,
}

/// Input for creating a new category
#[derive(Debug, Clone)]
pub struct CreateCategory {
    /// Category name
    pub name: String,

    /// Category description
    pub description: String,

    /// Display color, 6 hex digits
    pub color: String,
}

/// Partial update for a category
///
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New color, 6 hex digits
    pub color: Option<String>,
}

impl UpdateCategory {
    /// True when the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.color.is_none()
    }
}

impl Category {
    /// Creates a new category
    pub async fn create(pool: &PgPool, data: CreateCategory) -> Result<Self, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, color)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, color
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.color)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    /// Lists all categories
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, StoreError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color
            FROM categories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Finds a category by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Lists categories not yet linked to the given task
    ///
    /// Expressed as an anti-join so the store computes the set difference;
    /// the full category set is never loaded into the application.
    pub async fn list_unassociated(
        pool: &PgPool,
        task_id: Uuid,
    ) -> Result<Vec<CategoryRef>, StoreError> {
        let categories = sqlx::query_as::<_, CategoryRef>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            WHERE NOT EXISTS (
                SELECT 1
                FROM task_categories tc
                WHERE tc.category_id = c.id AND tc.task_id = $1
            )
            ORDER BY c.name ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Applies a partial update to a category
    ///
    /// Fields absent from the patch keep their stored value; a single
    /// atomic statement, no read-then-write. Returns `Ok(None)` when no
    /// row matched.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCategory,
    ) -> Result<Option<Self>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                color = COALESCE($4, color)
            WHERE id = $1
            RETURNING id, name, description, color
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.color)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Deletes a category, returning the deleted row
    ///
    /// Association rows are removed by the store's cascade rule. Returns
    /// `Ok(None)` when no row matched.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            DELETE FROM categories
            WHERE id = $1
            RETURNING id, name, description, color
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }
}
