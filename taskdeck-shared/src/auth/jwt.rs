/// JWT token pairs for user authentication
///
/// Every successful login or refresh issues a `TokenPair`: a short-lived
/// access token and a long-lived refresh token. Both are HS256-signed
/// assertions of `(sub = user id, email)`, but each token class is signed
/// with its own secret, so an access token can never be replayed against
/// the refresh endpoint and vice versa.
///
/// Tokens are stateless: nothing is persisted, and a pair can always be
/// reconstructed from the subject identity alone.
///
/// # Token Types
///
/// - **Access token**: 15 minutes, authenticates API requests
/// - **Refresh token**: 7 days, exchanged for a fresh pair
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{JwtKeys, TokenPair, validate_access_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let keys = JwtKeys {
///     access_secret: "access-secret-key-at-least-32-bytes!".to_string(),
///     refresh_secret: "refresh-secret-key-at-least-32-byte!".to_string(),
/// };
///
/// let user_id = Uuid::new_v4();
/// let pair = TokenPair::issue(user_id, "user@example.com", &keys)?;
///
/// let claims = validate_access_token(&pair.access_token, &keys)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer claim value
const ISSUER: &str = "taskdeck";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// Token class identifier
///
/// The class determines the expiry window and which signing secret is
/// used. It is deliberately NOT embedded as a claim: cross-class replay
/// fails signature validation because the secrets differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token (short-lived, 15 minutes)
    Access,

    /// Refresh token (long-lived, 7 days)
    Refresh,
}

impl TokenType {
    /// Gets the expiration window for this token class
    pub fn expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::minutes(15),
            TokenType::Refresh => Duration::days(7),
        }
    }
}

/// Signing secrets, one per token class
///
/// Secrets must be distinct; sharing one secret across classes would let
/// a refresh token double as an access token.
#[derive(Debug, Clone)]
pub struct JwtKeys {
    /// Secret for signing/validating access tokens
    pub access_secret: String,

    /// Secret for signing/validating refresh tokens
    pub refresh_secret: String,
}

impl JwtKeys {
    /// Returns the secret for the given token class
    fn secret_for(&self, token_type: TokenType) -> &str {
        match token_type {
            TokenType::Access => &self.access_secret,
            TokenType::Refresh => &self.refresh_secret,
        }
    }
}

/// JWT claims structure
///
/// Standard claims plus the subject's email, which lets handlers echo the
/// authenticated identity without a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Subject's email address
    pub email: String,

    /// Issuer - always "taskdeck"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for the given identity and token class
    pub fn new(user_id: Uuid, email: &str, token_type: TokenType) -> Self {
        let now = Utc::now();
        let expiration = now + token_type.expiration();

        Self {
            sub: user_id,
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Creates claims with a custom expiration window
    pub fn with_expiration(user_id: Uuid, email: &str, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// An access/refresh token pair issued for one subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (15 minutes)
    pub access_token: String,

    /// Refresh token (7 days)
    pub refresh_token: String,
}

impl TokenPair {
    /// Issues a fresh token pair for the given identity
    ///
    /// Pure function of `(user_id, email)` plus the signing keys: the two
    /// signings are independent computations with no ordering dependency
    /// or shared state between them.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if either signing fails.
    pub fn issue(user_id: Uuid, email: &str, keys: &JwtKeys) -> Result<Self, JwtError> {
        let access_claims = Claims::new(user_id, email, TokenType::Access);
        let refresh_claims = Claims::new(user_id, email, TokenType::Refresh);

        let access_token = create_token(&access_claims, keys.secret_for(TokenType::Access))?;
        let refresh_token = create_token(&refresh_claims, keys.secret_for(TokenType::Refresh))?;

        Ok(Self {
            access_token,
            refresh_token,
        })
    }
}

/// Creates a signed JWT from claims
///
/// Signs using HS256 with the provided secret. Secrets should be at
/// least 32 bytes; `Config::from_env` enforces this at startup.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies the signature, expiration, not-before time, and issuer.
///
/// # Errors
///
/// Returns `JwtError::Expired` for stale tokens, `JwtError::InvalidIssuer`
/// for a wrong issuer, `JwtError::ValidationError` otherwise.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token against the access-token secret
pub fn validate_access_token(token: &str, keys: &JwtKeys) -> Result<Claims, JwtError> {
    validate_token(token, &keys.access_secret)
}

/// Validates a token against the refresh-token secret
pub fn validate_refresh_token(token: &str, keys: &JwtKeys) -> Result<Claims, JwtError> {
    validate_token(token, &keys.refresh_secret)
}
