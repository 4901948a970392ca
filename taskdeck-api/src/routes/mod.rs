/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: authentication endpoints (login, refresh, logout)
/// - `users`: registration and user directory CRUD
/// - `tasks`: task CRUD, filtering, and category association
/// - `categories`: category CRUD and the unassociated query
/// - `comments`: comment CRUD

pub mod auth;
pub mod categories;
pub mod comments;
pub mod health;
pub mod tasks;
pub mod users;
