/// Storage error classification
///
/// All repositories funnel their sqlx failures through this module so that
/// Postgres error codes are interpreted in exactly one place. Repositories
/// and route handlers match on `StoreError` variants instead of inspecting
/// driver-level codes themselves.
///
/// # Classified codes
///
/// | Code    | Meaning                        | Variant                |
/// |---------|--------------------------------|------------------------|
/// | `23505` | unique_violation               | `UniqueViolation`      |
/// | `23503` | foreign_key_violation          | `ForeignKeyViolation`  |
/// | `22P02` | invalid_text_representation    | `InvalidInput`         |
/// | `23502` | not_null_violation             | `NotNullViolation`     |
/// | `22001` | string_data_right_truncation   | `ValueTooLong`         |
///
/// Anything else stays a `Database` error and is surfaced to the boundary
/// as an internal failure.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::error::StoreError;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), StoreError> {
/// let row: (i64,) = sqlx::query_as("SELECT 1::bigint")
///     .fetch_one(&pool)
///     .await
///     .map_err(StoreError::from)?;
/// # Ok(())
/// # }
/// ```

use thiserror::Error;

/// Postgres SQLSTATE codes recognized by the classifier
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_INVALID_TEXT_REPRESENTATION: &str = "22P02";
const PG_NOT_NULL_VIOLATION: &str = "23502";
const PG_STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Typed outcome of a failed storage operation
///
/// `ForeignKeyViolation` is direction-agnostic: an insert referencing a
/// missing row and a delete blocked by dependent rows raise the same
/// SQLSTATE. Call sites that know the direction (delete handlers) map it
/// to a conflict; everything else treats it as bad input.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched the statement
    #[error("row not found")]
    NotFound,

    /// Unique constraint tripped (e.g. duplicate email)
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint tripped
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Input could not be parsed by the store (e.g. malformed UUID)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required column was missing a value
    #[error("missing required column: {0}")]
    NotNullViolation(String),

    /// Value exceeded the column's length limit
    #[error("value too long for column")]
    ValueTooLong,

    /// Unclassified database failure
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Classifies a raw SQLSTATE code into a `StoreError`
    ///
    /// `detail` is the driver-supplied message, carried along for
    /// server-side logging. Unknown codes return `None` so the caller can
    /// preserve the original error.
    fn classify(code: &str, detail: String) -> Option<Self> {
        match code {
            PG_UNIQUE_VIOLATION => Some(StoreError::UniqueViolation(detail)),
            PG_FOREIGN_KEY_VIOLATION => Some(StoreError::ForeignKeyViolation(detail)),
            PG_INVALID_TEXT_REPRESENTATION => Some(StoreError::InvalidInput(detail)),
            PG_NOT_NULL_VIOLATION => Some(StoreError::NotNullViolation(detail)),
            PG_STRING_DATA_RIGHT_TRUNCATION => Some(StoreError::ValueTooLong),
            _ => None,
        }
    }

    /// True when the error represents a uniqueness conflict
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }

    /// True when the error represents a foreign key conflict
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, StoreError::ForeignKeyViolation(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => {
                let detail = db_err.message().to_string();
                let code = db_err.code().map(|c| c.to_string());
                match code.and_then(|c| StoreError::classify(&c, detail)) {
                    Some(classified) => classified,
                    None => StoreError::Database(sqlx::Error::Database(db_err)),
                }
            }
            other => StoreError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unique_violation() {
        let err = StoreError::classify("23505", "duplicate key".to_string()).unwrap();
        assert!(err.is_unique_violation());
        assert!(!err.is_foreign_key_violation());
    }

    #[test]
    fn test_classify_foreign_key_violation() {
        let err = StoreError::classify("23503", "fk violation".to_string()).unwrap();
        assert!(err.is_foreign_key_violation());
    }

    #[test]
    fn test_classify_bad_input_codes() {
        assert!(matches!(
            StoreError::classify("22P02", "bad uuid".to_string()),
            Some(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            StoreError::classify("23502", "null name".to_string()),
            Some(StoreError::NotNullViolation(_))
        ));
        assert!(matches!(
            StoreError::classify("22001", String::new()),
            Some(StoreError::ValueTooLong)
        ));
    }

    #[test]
    fn test_unknown_code_is_not_classified() {
        assert!(StoreError::classify("40001", "serialization".to_string()).is_none());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::UniqueViolation("users_email_key".to_string());
        assert_eq!(
            err.to_string(),
            "unique constraint violated: users_email_key"
        );

        assert_eq!(StoreError::NotFound.to_string(), "row not found");
    }
}
