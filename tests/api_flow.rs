//! End-to-end request flow through the router
//!
//! Run: cargo test --test api_flow

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use ticket_server::audit::{LogLevel, LogQuery};
use ticket_server::db::models::{EngineerUser, UserCreate};
use ticket_server::{Config, ServerState, build_app};

async fn test_app() -> (Router, ServerState, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(tmp.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await.unwrap();
    (build_app(state.clone()), state, tmp)
}

/// Stored "On call changed" INFO notices attributed to one actor
async fn on_call_notices(state: &ServerState, actor: &str) -> Vec<String> {
    let (entries, _) = state
        .audit_service
        .query(&LogQuery {
            level: Some(LogLevel::Info),
            username: Some(actor.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    entries
        .into_iter()
        .filter(|e| e.message.starts_with("On call changed:"))
        .map(|e| e.message)
        .collect()
}

/// Poll until the worker has stored the expected number of notices
async fn wait_for_on_call_notices(state: &ServerState, actor: &str, expected: usize) -> Vec<String> {
    for _ in 0..50 {
        let notices = on_call_notices(state, actor).await;
        if notices.len() >= expected {
            return notices;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    on_call_notices(state, actor).await
}

async fn send_json(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/register",
        None,
        json!({
            "username": username,
            "first_name": "Test",
            "last_name": "Engineer",
            "email": format!("{username}@example.com"),
            "password": "correct-horse-battery",
            "password_confirmation": "correct-horse-battery",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _state, _tmp) = test_app().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_routes_require_a_token() {
    let (app, _state, _tmp) = test_app().await;

    let request = Request::builder()
        .uri("/api/tickets")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_and_create_ticket() {
    let (app, _state, _tmp) = test_app().await;
    let token = register(&app, "alice").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        json!({"username": "alice", "password": "correct-horse-battery"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "alice");

    let (status, ticket) = send_json(
        &app,
        "POST",
        "/api/tickets",
        Some(&token),
        json!({
            "title": "Printer's down",
            "description": "Paper jam & error light",
            "priority": "High",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "creation failed: {ticket}");
    assert_eq!(ticket["title"], "Printer&#x27;s down");
    assert_eq!(ticket["description"], "Paper jam &amp; error light");
    assert_eq!(ticket["status"], "ToDo");
    assert_eq!(ticket["reporter_name"], "alice");
}

#[tokio::test]
async fn script_submission_returns_rejected_form() {
    let (app, _state, _tmp) = test_app().await;
    let token = register(&app, "mallory").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/tickets",
        Some(&token),
        json!({
            "title": "Totally fine",
            "description": "<script>alert(1)</script>",
            "priority": "Low",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0002");
    assert_eq!(body["message"], "Invalid form.");
    assert_eq!(body["form"]["accepted"], false);
    assert_eq!(body["form"]["outcomes"]["description"]["rejected"], true);
    assert_eq!(
        body["form"]["outcomes"]["description"]["error"],
        "Invalid description"
    );

    // Nothing was persisted
    let (status, list) = send_json(&app, "GET", "/api/tickets", Some(&token), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["tickets"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn wrong_password_is_rejected_with_unified_message() {
    let (app, _state, _tmp) = test_app().await;
    register(&app, "alice").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        json!({"username": "alice", "password": "wrong-password-here"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid username or password.");
}

#[tokio::test]
async fn ticket_deletion_requires_admin() {
    let (app, _state, _tmp) = test_app().await;
    let token = register(&app, "alice").await;

    let (status, ticket) = send_json(
        &app,
        "POST",
        "/api/tickets",
        Some(&token),
        json!({
            "title": "Disk full",
            "description": "Server logs",
            "priority": "Medium",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = ticket["id"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/tickets/{id}"),
        Some(&token),
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_ticket_returns_not_found() {
    let (app, _state, _tmp) = test_app().await;
    let token = register(&app, "alice").await;

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/tickets/ticket:doesnotexist",
        Some(&token),
        Value::Null,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ticket does not exist.");
}

#[tokio::test]
async fn setting_on_call_records_the_audit_notice() {
    let (app, state, _tmp) = test_app().await;
    let token = register(&app, "alice").await;
    register(&app, "bob").await;

    let (status, engineers) =
        send_json(&app, "GET", "/api/engineers", Some(&token), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    let bob_id = engineers
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["username"] == "bob")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/engineers/on-call",
        Some(&token),
        json!({"engineer_id": bob_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "assignment failed: {body}");
    assert_eq!(body["username"], "bob");
    assert_eq!(body["is_on_call"], true);

    let notices = wait_for_on_call_notices(&state, "alice", 1).await;
    assert_eq!(notices, vec!["On call changed: [Test Engineer]."]);
}

#[tokio::test]
async fn admin_edit_true_to_true_emits_no_on_call_notice() {
    let (app, state, _tmp) = test_app().await;

    // Admin accounts are not created through registration
    state
        .users()
        .create(UserCreate {
            username: "admin".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            hash_pass: EngineerUser::hash_password("correct-horse-battery").unwrap(),
            is_admin: true,
            is_on_call: false,
        })
        .await
        .unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        json!({"username": "admin", "password": "correct-horse-battery"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let admin_token = body["token"].as_str().unwrap().to_string();

    register(&app, "bob").await;
    register(&app, "carol").await;
    let (_, engineers) =
        send_json(&app, "GET", "/api/engineers", Some(&admin_token), Value::Null).await;
    let id_of = |name: &str| {
        engineers
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["username"] == name)
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string()
    };
    let bob_id = id_of("bob");
    let carol_id = id_of("carol");

    state.users().set_on_call(&bob_id).await.unwrap();

    // bob is already on call, so this edit must stay silent
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/engineers/{bob_id}"),
        Some(&admin_token),
        json!({"is_on_call": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A real handover; once its notice is stored the worker has drained
    // everything the bob edit could have emitted before it
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/engineers/{carol_id}"),
        Some(&admin_token),
        json!({"is_on_call": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let notices = wait_for_on_call_notices(&state, "admin", 1).await;
    assert_eq!(notices, vec!["On call changed: [Test Engineer]."]);
}
