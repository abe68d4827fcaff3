//! API integration tests.
//!
//! These tests drive the router over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use chrono::{Duration, Utc};
use promptvault_api::{AppState, auth_middleware, router as api_router};
use promptvault_common::config::{
    Config, DatabaseConfig, PaginationConfig, ServerConfig, TrendingConfig, VotingConfig,
};
use promptvault_db::entities::{prompt, prompt_tag, user, vote};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::Value;
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        pagination: PaginationConfig::default(),
        trending: TrendingConfig::default(),
        voting: VotingConfig { max_retries: 0 },
    }
}

fn create_test_user(id: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: id.to_string(),
        email: Some(format!("{id}@example.com")),
        token: Some(format!("token-{id}")),
        is_admin: false,
        created_at: Utc::now().into(),
    }
}

fn create_test_prompt(id: &str, upvotes: i32, downvotes: i32, age_hours: i64) -> prompt::Model {
    let created_at = Utc::now() - Duration::hours(age_hours);
    prompt::Model {
        id: id.to_string(),
        user_id: "alice".to_string(),
        title: format!("Prompt {id}"),
        prompt_text: "Explain it simply".to_string(),
        is_public: true,
        upvotes,
        downvotes,
        created_at: created_at.into(),
        updated_at: created_at.into(),
    }
}

fn create_test_vote(vote_type: vote::VoteType) -> vote::Model {
    vote::Model {
        id: "v1".to_string(),
        user_id: "bob".to_string(),
        prompt_id: "p1".to_string(),
        vote_type,
        created_at: Utc::now().into(),
    }
}

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

/// Create the test router over a prepared mock database.
fn create_test_router(db: MockDatabase) -> Router {
    let state = AppState::new(Arc::new(db.into_connection()), &create_test_config());
    api_router().with_state(state)
}

fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

async fn send(app: Router, method: &str, uri: &str, user: Option<user::Model>) -> Response {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(user) = user {
        builder = builder.extension(user);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ==================== Votes ====================

#[tokio::test]
async fn test_upvote_requires_authentication() {
    let app = create_test_router(mock());

    let response = send(app, "POST", "/prompts/p1/upvote", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upvote_returns_id_and_score() {
    let db = mock()
        .append_query_results([[create_test_prompt("p1", 10, 2, 1)]])
        .append_query_results([Vec::<vote::Model>::new()])
        .append_exec_results([exec(1), exec(1)]);
    let app = create_test_router(db);

    let response = send(app, "POST", "/prompts/p1/upvote", Some(create_test_user("bob"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], "p1");
    assert_eq!(body["score"], 9);
}

#[tokio::test]
async fn test_vote_on_private_or_missing_prompt_is_not_found() {
    let db = mock().append_query_results([Vec::<prompt::Model>::new()]);
    let app = create_test_router(db);

    let response = send(app, "POST", "/prompts/p1/downvote", Some(create_test_user("alice"))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "PROMPT_NOT_FOUND");
}

#[tokio::test]
async fn test_repeat_upvote_is_conflict() {
    let db = mock()
        .append_query_results([[create_test_prompt("p1", 1, 0, 1)]])
        .append_query_results([[create_test_vote(vote::VoteType::Up)]]);
    let app = create_test_router(db);

    let response = send(app, "POST", "/prompts/p1/upvote", Some(create_test_user("bob"))).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "ALREADY_VOTED");
    assert_eq!(body["error"]["message"], "Already upvoted");
}

#[tokio::test]
async fn test_remove_vote_returns_null_user_vote() {
    let db = mock()
        .append_query_results([[create_test_prompt("p1", 3, 1, 1)]])
        .append_query_results([[create_test_vote(vote::VoteType::Down)]])
        .append_exec_results([exec(1), exec(1)]);
    let app = create_test_router(db);

    let response = send(app, "POST", "/prompts/p1/remove_vote", Some(create_test_user("bob"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], "p1");
    assert_eq!(body["upvotes"], 3);
    assert_eq!(body["downvotes"], 0);
    assert_eq!(body["score"], 3);
    assert!(body["user_vote"].is_null());
    assert!(body.as_object().unwrap().contains_key("user_vote"));
}

#[tokio::test]
async fn test_remove_absent_vote_is_conflict() {
    let db = mock()
        .append_query_results([[create_test_prompt("p1", 3, 1, 1)]])
        .append_query_results([Vec::<vote::Model>::new()]);
    let app = create_test_router(db);

    let response = send(app, "POST", "/prompts/p1/remove_vote", Some(create_test_user("bob"))).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "NO_VOTE");
}

// ==================== Trending ====================

#[tokio::test]
async fn test_trending_anonymous() {
    let db = mock()
        .append_query_results([[
            create_test_prompt("p3", 1, 0, 0),
            create_test_prompt("p2", 10, 2, 22),
            create_test_prompt("p1", 10, 2, 0),
        ]])
        // Authors, then tag links.
        .append_query_results([[create_test_user("alice")]])
        .append_query_results([Vec::<prompt_tag::Model>::new()]);
    let app = create_test_router(db);

    let response = send(app, "GET", "/prompts/trending", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 3);
    assert!(body["next"].is_null());
    assert!(body["previous"].is_null());

    let results = body["results"].as_array().unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
    assert_eq!(results[0]["author_username"], "alice");
    assert_eq!(results[0]["score"], 8);
    assert!(!results[0].as_object().unwrap().contains_key("user_vote"));
}

#[tokio::test]
async fn test_trending_authenticated_includes_user_vote() {
    let db = mock()
        .append_query_results([[
            create_test_prompt("p1", 5, 0, 0),
            create_test_prompt("p2", 1, 0, 0),
        ]])
        .append_query_results([[create_test_user("alice")]])
        .append_query_results([Vec::<prompt_tag::Model>::new()])
        .append_query_results([[create_test_vote(vote::VoteType::Up)]]);
    let app = create_test_router(db);

    let response = send(app, "GET", "/prompts/trending?page_size=1", Some(create_test_user("bob"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["next"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["user_vote"], "up");
}

#[tokio::test]
async fn test_trending_empty_page() {
    let db = mock().append_query_results([Vec::<prompt::Model>::new()]);
    let app = create_test_router(db);

    let response = send(app, "GET", "/prompts/trending?tag=nothing", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 0);
    assert!(body["next"].is_null());
    assert!(body["previous"].is_null());
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_trending_page_zero_is_bad_request() {
    let app = create_test_router(mock());

    let response = send(app, "GET", "/prompts/trending?page=0", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ==================== Prompts, tags, users ====================

#[tokio::test]
async fn test_list_prompts_requires_authentication() {
    let app = create_test_router(mock());

    let response = send(app, "GET", "/prompts", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_show_private_prompt_hidden() {
    let mut private = create_test_prompt("p1", 0, 0, 1);
    private.is_public = false;
    let db = mock().append_query_results([[private]]);
    let app = create_test_router(db);

    let response = send(app, "GET", "/prompts/p1", Some(create_test_user("bob"))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_tags() {
    let db = mock().append_query_results([[promptvault_db::entities::tag::Model {
        id: "t1".to_string(),
        name: "coding".to_string(),
    }]]);
    let app = create_test_router(db);

    let response = send(app, "GET", "/tags", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body[0]["name"], "coding");
}

#[tokio::test]
async fn test_me_through_bearer_token() {
    let db = mock().append_query_results([[create_test_user("bob")]]);
    let state = AppState::new(Arc::new(db.into_connection()), &create_test_config());
    let app = api_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/user/me")
                .header("Authorization", "Bearer token-bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["username"], "bob");
    assert_eq!(body["email"], "bob@example.com");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(mock());

    let response = send(app, "GET", "/nonexistent/endpoint", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
