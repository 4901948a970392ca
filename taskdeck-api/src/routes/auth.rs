/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/login` - verify credentials, issue a token pair
/// - `POST /v1/auth/refresh` - exchange a refresh token for a fresh pair
/// - `POST /v1/auth/logout` - stateless placeholder (see below)
///
/// Login failures are deliberately uniform: an unknown email and a wrong
/// password produce byte-identical responses, so callers cannot probe
/// which accounts exist.
///
/// Logout is a no-op at this design's scope. Stateless tokens would need
/// a server-side revocation store (denylist or per-user token epoch) for
/// logout to have an effect; until then the endpoint only acknowledges.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{jwt::TokenPair, middleware::AuthContext, password},
    models::user::User,
};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Token pair response, returned by login and refresh
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    /// Access token (15 minutes)
    pub access_token: String,

    /// Refresh token (7 days)
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Acknowledgement message
    pub message: String,
}

/// Login endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (identical in
///   both cases)
/// - `422 Unprocessable Entity`: validation failed
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    req.validate()?;

    let user = User::find_by_email_with_credentials(&state.db, &req.email).await?;

    // Resolve the hash check before branching so both failure paths take
    // the same route through this function.
    let verified = match &user {
        Some(user) => password::verify_password(&req.password, &user.password_hash)?,
        None => false,
    };

    let user = match (user, verified) {
        (Some(user), true) => user,
        _ => return Err(ApiError::Unauthorized("Invalid credentials".to_string())),
    };

    let pair = TokenPair::issue(user.id, &user.email, &state.jwt_keys())?;

    Ok(Json(pair.into()))
}

/// Token refresh endpoint
///
/// Guarded by the refresh-token middleware, so `auth` carries the subject
/// from a valid refresh token. The subject is re-checked against the
/// store: a user deleted after their refresh token was issued must not be
/// able to mint new tokens.
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid refresh token
/// - `403 Forbidden`: subject no longer exists
/// - `500 Internal Server Error`: server error
pub async fn refresh(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TokenPairResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("Access denied".to_string()))?;

    let pair = TokenPair::issue(user.id, &user.email, &state.jwt_keys())?;

    Ok(Json(pair.into()))
}

/// Logout endpoint (stateless placeholder)
///
/// Requires a valid access token but performs no server-side work;
/// clients discard their tokens locally.
pub async fn logout(Extension(auth): Extension<AuthContext>) -> ApiResult<Json<LogoutResponse>> {
    tracing::debug!(user_id = %auth.user_id, "Logout acknowledged");

    Ok(Json(LogoutResponse {
        message: "Session closed".to_string(),
    }))
}
