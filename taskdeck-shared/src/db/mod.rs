/// Database layer for TaskDeck
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool construction with health checks
/// - `migrations`: embedded sqlx migration runner
///
/// Models live in the `models` module at the crate root.

pub mod migrations;
pub mod pool;
