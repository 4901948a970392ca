/// Integration tests for the TaskDeck API
///
/// These tests verify the full system works end-to-end against a real
/// database:
/// - registration and login with uniform credential failures
/// - token refresh, including refresh for a deleted subject
/// - task creation defaults (pending status, zero story points)
/// - idempotent category association and the unassociated query
/// - aggregated task reads (names, categories, comments)
/// - referential-integrity-aware user deletion
///
/// Requires DATABASE_URL; see tests/common/mod.rs.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use taskdeck_shared::models::user::User;

#[tokio::test]
async fn test_register_login_roundtrip() {
    let ctx = TestContext::new().await.unwrap();

    // The seeded context user can log in with the context password
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": ctx.user.email.clone(), "password": common::TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let email = format!("register-{}@example.com", uuid::Uuid::new_v4());
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/users",
            None,
            Some(json!({
                "name": "Registered User",
                "email": email,
                "password": "secret123"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    assert_eq!(body["email"], email.as_str());
    // The stored record never leaks credentials
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    ctx.track_user(body["id"].as_str().unwrap().parse().unwrap());

    // Correct credentials yield a token pair
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    // Wrong password and unknown email fail identically
    let (wrong_status, wrong_body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "not-the-password" })),
        )
        .await;
    let (unknown_status, unknown_body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "secret123" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body, "credential failures must not be distinguishable");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let ctx = TestContext::new().await.unwrap();

    let payload = json!({
        "name": "Duplicate",
        "email": format!("dup-{}@example.com", uuid::Uuid::new_v4()),
        "password": "secret123"
    });

    let (status, body) = ctx.request("POST", "/v1/users", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    ctx.track_user(body["id"].as_str().unwrap().parse().unwrap());

    let (status, body) = ctx.request("POST", "/v1/users", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_refresh_flow() {
    let ctx = TestContext::new().await.unwrap();

    // A valid refresh token yields a new pair with the same subject
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(&ctx.tokens.refresh_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "refresh failed: {}", body);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    // An access token must not be accepted by the refresh endpoint
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(&ctx.tokens.access_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Refresh for a deleted subject is forbidden
    let (victim, victim_tokens) = ctx.create_user("Deleted User").await.unwrap();
    User::delete(&ctx.db, victim.id).await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(&victim_tokens.refresh_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_task_creation_defaults() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.tokens.access_token.clone();

    // Negative story points are rejected
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/tasks",
            Some(&token),
            Some(json!({
                "name": "Bad estimate",
                "assignee_id": ctx.user.id,
                "story_points": -1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Absent story points store 0; a supplied status is ignored
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/tasks",
            Some(&token),
            Some(json!({
                "name": "Fresh task",
                "assignee_id": ctx.user.id,
                "status": "done"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", body);
    assert_eq!(body["story_points"], 0);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["creator_id"], ctx.user.id.to_string());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_task_partial_update_coalesces() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.tokens.access_token.clone();

    let (_, task) = ctx
        .request(
            "POST",
            "/v1/tasks",
            Some(&token),
            Some(json!({
                "name": "Patch me",
                "description": "original description",
                "assignee_id": ctx.user.id,
                "story_points": 3
            })),
        )
        .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    // Patch only the status: everything else keeps its value
    let (status, body) = ctx
        .request(
            "PATCH",
            &format!("/v1/tasks/{}", task_id),
            Some(&token),
            Some(json!({ "status": "in_progress" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["description"], "original description");
    assert_eq!(body["story_points"], 3);

    // An empty patch returns the current row unchanged
    let (status, body) = ctx
        .request(
            "PATCH",
            &format!("/v1/tasks/{}", task_id),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_association_is_idempotent() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.tokens.access_token.clone();

    let (_, task) = ctx
        .request(
            "POST",
            "/v1/tasks",
            Some(&token),
            Some(json!({ "name": "Tagged task", "assignee_id": ctx.user.id })),
        )
        .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    let (_, category) = ctx
        .request(
            "POST",
            "/v1/categories",
            Some(&token),
            Some(json!({
                "name": format!("cat-{}", uuid::Uuid::new_v4()),
                "description": "test category",
                "color": "ff8800"
            })),
        )
        .await;
    let category_id = category["id"].as_str().unwrap().to_string();
    ctx.track_category(category_id.parse().unwrap());

    // First association creates the link
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/v1/tasks/{}/categories", task_id),
            Some(&token),
            Some(json!({ "category_ids": [category_id.clone()] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Re-associating the same pair is a no-op, not an error
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/v1/tasks/{}/categories", task_id),
            Some(&token),
            Some(json!({ "category_ids": [category_id.clone()] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // Exactly one association row exists
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM task_categories WHERE task_id = $1::uuid")
            .bind(&task_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(count, 1);

    // The linked category never shows up as unassociated
    let (status, body) = ctx
        .request(
            "GET",
            &format!("/v1/tasks/{}/categories/unassociated", task_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let unassociated = body.as_array().unwrap();
    assert!(unassociated
        .iter()
        .all(|c| c["id"].as_str().unwrap() != category_id));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_end_to_end_aggregation() {
    let ctx = TestContext::new().await.unwrap();

    // User A creates, user B is assigned and comments
    let (user_a, tokens_a) = ctx.create_user("Alice Creator").await.unwrap();
    let (user_b, tokens_b) = ctx.create_user("Bob Assignee").await.unwrap();

    let (status, task) = ctx
        .request(
            "POST",
            "/v1/tasks",
            Some(&tokens_a.access_token),
            Some(json!({
                "name": "Cross-user task",
                "assignee_id": user_b.id,
                "story_points": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", task);
    let task_id = task["id"].as_str().unwrap().to_string();

    // A associates two categories
    let mut category_ids = vec![];
    for name in ["frontend", "backend"] {
        let (_, category) = ctx
            .request(
                "POST",
                "/v1/categories",
                Some(&tokens_a.access_token),
                Some(json!({
                    "name": format!("{}-{}", name, uuid::Uuid::new_v4()),
                    "description": "e2e category",
                    "color": "00ff00"
                })),
            )
            .await;
        let id = category["id"].as_str().unwrap().to_string();
        ctx.track_category(id.parse().unwrap());
        category_ids.push(id);
    }

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/tasks/{}/categories", task_id),
            Some(&tokens_a.access_token),
            Some(json!({ "category_ids": category_ids })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // B adds a comment
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/comments",
            Some(&tokens_b.access_token),
            Some(json!({ "task_id": task_id.clone(), "content": "on it" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Fetching the task rolls everything up
    let (status, body) = ctx
        .request(
            "GET",
            &format!("/v1/tasks/{}", task_id),
            Some(&tokens_a.access_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["story_points"], 5);
    assert_eq!(body["creator_name"], "Alice Creator");
    assert_eq!(body["assignee_name"], "Bob Assignee");
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);

    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "on it");

    // Deleting A while the task exists is a conflict, not an internal error
    let (status, body) = ctx
        .request(
            "DELETE",
            &format!("/v1/users/{}", user_a.id),
            Some(&tokens_a.access_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "unexpected: {}", body);
    assert_eq!(body["error"], "conflict");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_user_update_policies() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.tokens.access_token.clone();
    let (user, _) = ctx.create_user("Patchable").await.unwrap();

    // An empty user patch is rejected
    let (status, _) = ctx
        .request(
            "PATCH",
            &format!("/v1/users/{}", user.id),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A one-field patch leaves the other field untouched
    let (status, body) = ctx
        .request(
            "PATCH",
            &format!("/v1/users/{}", user.id),
            Some(&token),
            Some(json!({ "name": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["email"], user.email.as_str());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/v1/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.request("GET", "/v1/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request("GET", "/v1/tasks", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}
