/// Task-category association rows
///
/// Many-to-many link between tasks and categories, one row per
/// `(task_id, category_id)` pair. Association is idempotent: re-linking an
/// already-linked pair is silently skipped, never an error.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

/// A single task-category link
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskCategory {
    /// Linked task
    pub task_id: Uuid,

    /// Linked category
    pub category_id: Uuid,
}

impl TaskCategory {
    /// Associates a batch of categories with a task
    ///
    /// All pairs are inserted in one statement; pairs that already exist
    /// are skipped by the store (`ON CONFLICT DO NOTHING`), so the
    /// returned rows are exactly the associations that were newly created.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ForeignKeyViolation` when the task or one of
    /// the categories does not exist.
    pub async fn associate(
        pool: &PgPool,
        task_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<Vec<Self>, StoreError> {
        let associations = sqlx::query_as::<_, TaskCategory>(
            r#"
            INSERT INTO task_categories (task_id, category_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            RETURNING task_id, category_id
            "#,
        )
        .bind(task_id)
        .bind(category_ids)
        .fetch_all(pool)
        .await?;

        Ok(associations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_category_serialization() {
        let link = TaskCategory {
            task_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
        };

        let json = serde_json::to_value(&link).unwrap();
        assert!(json["task_id"].is_string());
        assert!(json["category_id"].is_string());
    }
}
