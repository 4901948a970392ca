/// Authentication utilities
///
/// This module provides the secure authentication primitives for TaskDeck:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: dual-secret access/refresh token pairs
/// - [`middleware`]: Axum Bearer-token middleware and `AuthContext`
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with per-user random salts
/// - **Token Pairs**: HS256, distinct secrets per token class,
///   15-minute access / 7-day refresh windows
/// - **Constant-time Comparison**: password verification never leaks
///   which check failed
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
/// use taskdeck_shared::auth::jwt::{JwtKeys, TokenPair};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let keys = JwtKeys {
///     access_secret: "access-secret-key-at-least-32-bytes!".to_string(),
///     refresh_secret: "refresh-secret-key-at-least-32-byte!".to_string(),
/// };
/// let pair = TokenPair::issue(Uuid::new_v4(), "user@example.com", &keys)?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
