/// Authentication middleware for Axum
///
/// Validates Bearer tokens from the Authorization header and injects an
/// `AuthContext` into request extensions. Two middleware flavors exist,
/// one per token class: access-token middleware guards regular API
/// routes, refresh-token middleware guards only the refresh endpoint.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskdeck_shared::auth::middleware::{create_access_middleware, AuthContext};
///
/// async fn protected(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.email)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .layer(middleware::from_fn(create_access_middleware(
///         "access-secret-at-least-32-bytes-long!",
///     )));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// Authenticated identity attached to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor. Presence of
/// this context is the only authorization concept: a request either
/// carries a verified subject or it is rejected.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user ID (token subject)
    pub user_id: Uuid,

    /// Subject's email address
    pub email: String,
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// Extracts the Bearer token from request headers
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` when the Authorization header
/// is absent, `AuthError::InvalidFormat` when it is not a Bearer token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Token-validating middleware shared by both token classes
///
/// The caller supplies the secret for the class it guards; cross-class
/// tokens fail signature validation because the secrets differ.
pub async fn token_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        email: claims.email,
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Creates an access-token middleware closure for the given secret
pub fn create_access_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(token_auth_middleware(secret, req, next))
    }
}

/// Creates a refresh-token middleware closure for the given secret
///
/// Identical mechanics to the access middleware; only the secret (and
/// therefore the accepted token class) differs.
pub fn create_refresh_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(token_auth_middleware(secret, req, next))
    }
}
