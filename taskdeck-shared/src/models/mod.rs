/// Database models for TaskDeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: user accounts (full record + public projection)
/// - `task`: tasks with filtered listing and enriched reads
/// - `category`: categories and the unassociated-categories query
/// - `task_category`: the many-to-many task/category association
/// - `comment`: task comments
///
/// Every operation takes the shared `PgPool` by reference and returns a
/// `Result<_, StoreError>`; nothing is cached between requests.

pub mod category;
pub mod comment;
pub mod task;
pub mod task_category;
pub mod user;
