/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskdeck_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::{
    jwt::{validate_access_token, validate_refresh_token, JwtKeys},
    middleware::{bearer_token, AuthContext},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; the pool
/// and config are cheap to clone (pool handle + Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the signing keys for token operations
    pub fn jwt_keys(&self) -> JwtKeys {
        self.config.jwt_keys()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /v1/                           # API v1 (versioned)
///     ├── /auth/
///     │   ├── POST /login            # public
///     │   ├── POST /refresh          # refresh token required
///     │   └── POST /logout           # access token required
///     ├── /users/
///     │   ├── POST   /               # register (public)
///     │   └── GET|PATCH|DELETE ...   # access token required
///     ├── /tasks/                    # access token required
///     │   ├── POST /:id/categories
///     │   └── GET  /:id/categories/unassociated
///     ├── /categories/               # access token required
///     └── /comments/                 # access token required
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth: login is public; refresh and logout each sit behind the
    // middleware for their token class
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .merge(
            Router::new()
                .route("/refresh", post(routes::auth::refresh))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    refresh_auth_layer,
                )),
        )
        .merge(
            Router::new()
                .route("/logout", post(routes::auth::logout))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    access_auth_layer,
                )),
        );

    // Users: registration is public, the rest requires an access token
    let user_routes = Router::new()
        .route("/", post(routes::users::register))
        .merge(
            Router::new()
                .route("/", get(routes::users::list_users))
                .route(
                    "/:id",
                    get(routes::users::get_user)
                        .patch(routes::users::update_user)
                        .delete(routes::users::delete_user),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    access_auth_layer,
                )),
        );

    // Tasks (all protected)
    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/categories", post(routes::tasks::associate_categories))
        .route(
            "/:id/categories/unassociated",
            get(routes::tasks::list_unassociated_categories),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_auth_layer,
        ));

    // Categories (all protected)
    let category_routes = Router::new()
        .route(
            "/",
            post(routes::categories::create_category).get(routes::categories::list_categories),
        )
        .route(
            "/:id",
            get(routes::categories::get_category)
                .patch(routes::categories::update_category)
                .delete(routes::categories::delete_category),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_auth_layer,
        ));

    // Comments (all protected)
    let comment_routes = Router::new()
        .route(
            "/",
            post(routes::comments::create_comment).get(routes::comments::list_comments),
        )
        .route(
            "/:id",
            get(routes::comments::get_comment)
                .patch(routes::comments::update_comment)
                .delete(routes::comments::delete_comment),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .nest("/categories", category_routes)
        .nest("/comments", comment_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Access-token authentication middleware layer
///
/// Extracts the Bearer token, validates it against the access secret, and
/// injects the authenticated subject into request extensions.
async fn access_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = bearer_token(req.headers()).map_err(|_| {
        crate::error::ApiError::Unauthorized("Missing or malformed bearer token".to_string())
    })?;

    let claims = validate_access_token(token, &state.jwt_keys())?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        email: claims.email,
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Refresh-token authentication middleware layer
///
/// Same mechanics as the access layer, validated against the refresh
/// secret instead. Guards only `POST /v1/auth/refresh`.
async fn refresh_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = bearer_token(req.headers()).map_err(|_| {
        crate::error::ApiError::Unauthorized("Missing or malformed bearer token".to_string())
    })?;

    let claims = validate_refresh_token(token, &state.jwt_keys())?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        email: claims.email,
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
