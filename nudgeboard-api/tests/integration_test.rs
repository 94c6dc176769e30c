/// Integration tests for the Nudgeboard API
///
/// These drive the full router over an in-memory SQLite database:
/// registration and login, the auth gate, the task lifecycle with its
/// notification fan-out, and the notification feed.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use nudgeboard_shared::auth::jwt::{create_token, Claims};
use serde_json::json;

fn task_body(title: &str, worker_ids: &[i64]) -> serde_json::Value {
    json!({
        "title": title,
        "priority": "medium",
        "deadline_date": "2030-06-01",
        "worker_ids": worker_ids,
    })
}

#[tokio::test]
async fn test_index_and_health_are_public() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.request("GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Nudgeboard API server");

    let (status, body) = ctx.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_register_login_roundtrip() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Jiho Park",
                "phone": "010-1234-5678",
                "birthdate": "1990-04-01",
                "password": "hunter2hunter2",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], 1);
    assert!(body["message"].is_string());

    // Same phone again is rejected
    let (status, body) = ctx
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Someone Else",
                "phone": "010-1234-5678",
                "birthdate": "1991-01-01",
                "password": "other-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Login with the right password
    let (status, body) = ctx
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({"phone": "010-1234-5678", "password": "hunter2hunter2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["user"]["name"], "Jiho Park");
    assert_eq!(body["user"]["is_admin"], false);
    assert!(body["user"].get("password_hash").is_none());

    // Wrong password and unknown phone both give the same 401
    let (status, _) = ctx
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({"phone": "010-1234-5678", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({"phone": "010-9999-9999", "password": "hunter2hunter2"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({"name": "No Phone", "birthdate": "1990-01-01", "password": "pw"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("phone"));

    let (status, _) = ctx
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Bad Date",
                "phone": "010-1",
                "birthdate": "April 1st",
                "password": "pw",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_gate() {
    let ctx = TestContext::new().await;

    // No credential at all
    let (status, body) = ctx.request("GET", "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    // A credential that fails validation
    let (status, _) = ctx
        .request("GET", "/api/tasks", Some("garbage-token"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An expired credential
    let expired = Claims::with_expiration(1, "010", false, chrono::Duration::seconds(-3600));
    let token = create_token(&expired, common::TEST_SECRET).unwrap();
    let (status, _) = ctx.request("GET", "/api/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_task_assigns_and_notifies() {
    let ctx = TestContext::new().await;
    let (_creator, token) = ctx.create_user("Creator", "010-0", "pw").await;
    let (worker_a, token_a) = ctx.create_user("Worker A", "010-1", "pw").await;
    let (worker_b, token_b) = ctx.create_user("Worker B", "010-2", "pw").await;

    // Duplicate worker ID in the request collapses to one link
    let (status, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(task_body("Paint fence", &[worker_a.id, worker_b.id, worker_b.id])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = body["taskId"].as_i64().unwrap();

    let (status, body) = ctx.request("GET", "/api/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"].as_i64().unwrap(), task_id);
    assert_eq!(tasks[0]["status"], "in_progress");
    assert_eq!(tasks[0]["creator_name"], "Creator");
    assert!(tasks[0]["completer_name"].is_null());
    assert_eq!(tasks[0]["workers"].as_array().unwrap().len(), 2);

    // Exactly one task_assigned notification per worker
    for token in [&token_a, &token_b] {
        let (_, feed) = ctx.request("GET", "/api/notifications", Some(token), None).await;
        let feed = feed.as_array().unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0]["kind"], "task_assigned");
        assert_eq!(feed[0]["task_title"], "Paint fence");
        assert_eq!(feed[0]["is_read"], false);
    }
}

#[tokio::test]
async fn test_create_task_validation() {
    let ctx = TestContext::new().await;
    let (_user, token) = ctx.create_user("Creator", "010-0", "pw").await;

    // Missing title
    let (status, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({"priority": "high", "deadline_date": "2030-06-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));

    // Missing priority
    let (status, _) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({"title": "t", "deadline_date": "2030-06-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown priority
    let (status, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({"title": "t", "priority": "urgent", "deadline_date": "2030-06-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("priority"));
}

#[tokio::test]
async fn test_create_task_accepts_client_aliases() {
    let ctx = TestContext::new().await;
    let (_creator, token) = ctx.create_user("Creator", "010-0", "pw").await;
    let (worker, _) = ctx.create_user("Worker", "010-1", "pw").await;

    // Older clients send "deadline" and "workerIds"
    let (status, _) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({
                "title": "Legacy payload",
                "priority": "low",
                "deadline": "2030-06-01",
                "workerIds": [worker.id],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = ctx.request("GET", "/api/tasks", Some(&token), None).await;
    assert_eq!(body[0]["workers"].as_array().unwrap().len(), 1);
    assert_eq!(body[0]["deadline_date"], "2030-06-01");
}

#[tokio::test]
async fn test_complete_task() {
    let ctx = TestContext::new().await;
    let (_creator, creator_token) = ctx.create_user("Creator", "010-0", "pw").await;
    let (worker, worker_token) = ctx.create_user("Worker", "010-1", "pw").await;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&creator_token),
            Some(task_body("Paint fence", &[worker.id])),
        )
        .await;
    let task_id = body["taskId"].as_i64().unwrap();

    // The worker completes it
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}/complete", task_id),
            Some(&worker_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx
        .request("GET", &format!("/api/tasks/{}", task_id), Some(&creator_token), None)
        .await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["completer_id"].as_i64().unwrap(), worker.id);
    assert_eq!(body["completer_name"], "Worker");
    assert!(body["completed_date"].is_string());

    // Workers are told about the completion (assignment + completion = 2)
    let (_, feed) = ctx
        .request("GET", "/api/notifications", Some(&worker_token), None)
        .await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["kind"], "task_completed");

    // Completing again still succeeds and re-records the completer
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}/complete", task_id),
            Some(&creator_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx
        .request("GET", &format!("/api/tasks/{}", task_id), Some(&creator_token), None)
        .await;
    assert_eq!(body["completer_name"], "Creator");

    // Unknown task is 404
    let (status, _) = ctx
        .request("PUT", "/api/tasks/999/complete", Some(&creator_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_replaces_worker_set() {
    let ctx = TestContext::new().await;
    let (_creator, token) = ctx.create_user("Creator", "010-0", "pw").await;
    let (worker_a, _) = ctx.create_user("Worker A", "010-1", "pw").await;
    let (worker_b, _) = ctx.create_user("Worker B", "010-2", "pw").await;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(task_body("Paint fence", &[worker_a.id, worker_b.id])),
        )
        .await;
    let task_id = body["taskId"].as_i64().unwrap();

    // Full replace with an empty worker list unassigns everyone
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&token),
            Some(json!({
                "title": "Paint the whole fence",
                "description": "Both sides",
                "priority": "high",
                "deadline_date": "2030-07-01",
                "worker_ids": [],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx
        .request("GET", &format!("/api/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(body["title"], "Paint the whole fence");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["status"], "in_progress", "status untouched when not sent");
    assert!(body["workers"].as_array().unwrap().is_empty());

    // Unknown task is 404
    let (status, _) = ctx
        .request(
            "PUT",
            "/api/tasks/999",
            Some(&token),
            Some(task_body("x", &[])),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task_cascades() {
    let ctx = TestContext::new().await;
    let (_creator, token) = ctx.create_user("Creator", "010-0", "pw").await;
    let (worker, worker_token) = ctx.create_user("Worker", "010-1", "pw").await;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(task_body("Doomed task", &[worker.id])),
        )
        .await;
    let task_id = body["taskId"].as_i64().unwrap();

    // The worker has an assignment notification before the delete
    let (_, feed) = ctx
        .request("GET", "/api/notifications", Some(&worker_token), None)
        .await;
    assert_eq!(feed.as_array().unwrap().len(), 1);

    let (status, _) = ctx
        .request("DELETE", &format!("/api/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request("GET", &format!("/api/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request("DELETE", &format!("/api/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The task's notifications went with it
    let (_, feed) = ctx
        .request("GET", "/api/notifications", Some(&worker_token), None)
        .await;
    assert!(feed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_nudge_fans_out() {
    let ctx = TestContext::new().await;
    let (_creator, token) = ctx.create_user("Creator", "010-0", "pw").await;
    let (worker_a, token_a) = ctx.create_user("Worker A", "010-1", "pw").await;
    let (worker_b, token_b) = ctx.create_user("Worker B", "010-2", "pw").await;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(task_body("Slow task", &[worker_a.id, worker_b.id])),
        )
        .await;
    let task_id = body["taskId"].as_i64().unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/api/tasks/{}/nudge", task_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    for token in [&token_a, &token_b] {
        let (_, feed) = ctx.request("GET", "/api/notifications", Some(token), None).await;
        let feed = feed.as_array().unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0]["kind"], "nudge");
    }

    // The task itself is untouched
    let (_, body) = ctx
        .request("GET", &format!("/api/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(body["status"], "in_progress");

    let (status, _) = ctx
        .request("POST", "/api/tasks/999/nudge", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_filter() {
    let ctx = TestContext::new().await;
    let (_creator, token) = ctx.create_user("Creator", "010-0", "pw").await;

    let (_, body) = ctx
        .request("POST", "/api/tasks", Some(&token), Some(task_body("Open", &[])))
        .await;
    let open_id = body["taskId"].as_i64().unwrap();

    let (_, body) = ctx
        .request("POST", "/api/tasks", Some(&token), Some(task_body("Done", &[])))
        .await;
    let done_id = body["taskId"].as_i64().unwrap();
    ctx.request(
        "PUT",
        &format!("/api/tasks/{}/complete", done_id),
        Some(&token),
        None,
    )
    .await;

    let (_, body) = ctx
        .request("GET", "/api/tasks?status=in_progress", Some(&token), None)
        .await;
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"].as_i64().unwrap(), open_id);

    let (_, body) = ctx
        .request("GET", "/api/tasks?status=completed", Some(&token), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Unknown filter values return everything
    let (_, body) = ctx
        .request("GET", "/api/tasks?status=all", Some(&token), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_mark_read_scoped_to_owner() {
    let ctx = TestContext::new().await;
    let (_creator, token) = ctx.create_user("Creator", "010-0", "pw").await;
    let (worker, worker_token) = ctx.create_user("Worker", "010-1", "pw").await;
    let (_other, other_token) = ctx.create_user("Other", "010-2", "pw").await;

    ctx.request(
        "POST",
        "/api/tasks",
        Some(&token),
        Some(task_body("Task", &[worker.id])),
    )
    .await;

    let (_, feed) = ctx
        .request("GET", "/api/notifications", Some(&worker_token), None)
        .await;
    let notification_id = feed[0]["id"].as_i64().unwrap();

    // Someone else marking it read is a silent no-op
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/notifications/{}/read", notification_id),
            Some(&other_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, feed) = ctx
        .request("GET", "/api/notifications", Some(&worker_token), None)
        .await;
    assert_eq!(feed[0]["is_read"], false);

    // The owner marking it read sticks
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/notifications/{}/read", notification_id),
            Some(&worker_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, feed) = ctx
        .request("GET", "/api/notifications", Some(&worker_token), None)
        .await;
    assert_eq!(feed[0]["is_read"], true);
}

#[tokio::test]
async fn test_user_endpoints() {
    let ctx = TestContext::new().await;
    let (alice, token) = ctx.create_user("Alice", "010-0", "pw").await;
    ctx.create_user("Bob", "010-1", "pw").await;

    let (status, body) = ctx.request("GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "Alice");
    assert!(users[0].get("password_hash").is_none());
    assert!(users[0].get("is_admin").is_none());

    let (status, body) = ctx
        .request("GET", &format!("/api/users/{}", alice.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["is_admin"], false);

    let (status, _) = ctx.request("GET", "/api/users/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
