/// User model and database operations
///
/// Users own tasks (as creator or assignee) and comments. Passwords are
/// stored as Argon2id hashes, never in plaintext; the hash-bearing record
/// stays internal to the credential flow, and every operation that crosses
/// the API boundary returns the public projection instead.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{CreateUser, User};
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(&pool, CreateUser {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

/// Full user record, including the password hash
///
/// Internal to the credential flow. Never serialize this across the API
/// boundary; use [`PublicUser`] instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,
}

/// Public projection of a user record (no credentials)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublicUser {
    /// Unique user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

/// Input for creating a new user
///
/// `password_hash` must already be hashed; this type never carries a
/// plaintext password.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,
}

/// Partial update for a user
///
/// Only name and email are mutable; the password hash is fixed at
/// registration. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    /// New display name
    pub name: Option<String>,

    /// New email address
    pub email: Option<String>,
}

impl UpdateUser {
    /// True when the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UniqueViolation` when the email is already
    /// registered.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<PublicUser, StoreError> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email, including the password hash
    ///
    /// For the login flow only. The returned record must never cross the
    /// API boundary.
    pub async fn find_by_email_with_credentials(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID (public projection)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PublicUser>, StoreError> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users (public projection)
    pub async fn list(pool: &PgPool) -> Result<Vec<PublicUser>, StoreError> {
        let users = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, name, email
            FROM users
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Applies a partial update to a user
    ///
    /// Fields absent from the patch keep their stored value. The update is
    /// a single atomic statement, so concurrent writers cannot interleave
    /// between a read and a write. Rejecting an empty patch is the
    /// boundary's job; an empty patch here is a harmless no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UniqueViolation` when the new email belongs to
    /// another user. Returns `Ok(None)` when no row matched.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<PublicUser>, StoreError> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING id, name, email
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user, returning the deleted public projection
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ForeignKeyViolation` when the user is still
    /// referenced by tasks or comments. Returns `Ok(None)` when no row
    /// matched.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<PublicUser>, StoreError> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, name, email
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());

        let patch = UpdateUser {
            name: Some("New Name".to_string()),
            email: None,
        };
        assert!(!patch.is_empty());

        let patch = UpdateUser {
            name: None,
            email: Some("new@example.com".to_string()),
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_public_user_serialization_has_no_hash() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("jane@example.com"));
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_update_user_deserializes_partial_payload() {
        let patch: UpdateUser = serde_json::from_str(r#"{"email": "x@y.com"}"#).unwrap();
        assert!(patch.name.is_none());
        assert_eq!(patch.email.as_deref(), Some("x@y.com"));
    }

    // Database-backed CRUD behavior is covered by the API integration
    // tests, which require DATABASE_URL.
}
