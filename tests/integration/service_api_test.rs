//! Integration tests for the service API used by the host application.

use axum::http::StatusCode;
use serde_json::json;

use notice_core::config::DispatchMode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_service_api_requires_key() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/notice-types", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["database"], "connected");
}

#[tokio::test]
async fn test_create_notice_type_reports_change() {
    let app = TestApp::new();
    let body = json!({ "label": "comment", "display": "Comment", "description": "New comment" });

    let first = app.service("POST", "/api/notice-types", Some(body.clone())).await;
    assert_eq!(first.data()["change"], "created");

    let again = app.service("POST", "/api/notice-types", Some(body)).await;
    assert_eq!(again.data()["change"], "unchanged");

    let edited = app
        .service(
            "POST",
            "/api/notice-types",
            Some(json!({ "label": "comment", "display": "Comments", "description": "New comment" })),
        )
        .await;
    assert_eq!(edited.data()["change"], "updated");

    let list = app.service("GET", "/api/notice-types", None).await;
    assert_eq!(list.data().as_array().unwrap().len(), 1);
    assert_eq!(list.data()[0]["display"], "Comments");
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected() {
    let app = TestApp::new();
    let response = app
        .service(
            "POST",
            "/api/notice-types",
            Some(json!({ "label": "x".repeat(41), "display": "Too long" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .service(
            "PUT",
            "/api/users",
            Some(json!({ "id": notice_core::types::id::UserId::new(), "username": "ana", "email": "nope" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_unknown_label_is_not_found() {
    let app = TestApp::new();
    let ana = app.create_user("ana", None).await;
    let response = app.send(&[ana], "missing", json!({})).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_immediate_send_delivers_to_every_accepting_medium() {
    let app = TestApp::new();
    app.create_notice_type("comment", 2).await;
    let ana = app.create_user("ana", Some("ana@example.com")).await;
    let bob = app.create_user("bob", None).await;

    let response = app.send(&[ana, bob], "comment", json!({ "note": "hi" })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["mode"], "delivered");
    assert_eq!(response.data()["recipients"], 2);
    assert_eq!(response.data()["delivered"].as_array().unwrap().len(), 3);

    let sent = app.outbox.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ana@example.com");
}

#[tokio::test]
async fn test_queued_send_waits_for_the_worker() {
    let app = TestApp::with_config(|c| c.notification.dispatch = DispatchMode::Queued);
    app.create_notice_type("comment", 2).await;
    let ana = app.create_user("ana", Some("ana@example.com")).await;
    let token = app.token(ana, false);

    let response = app.send(&[ana], "comment", json!({})).await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.data()["mode"], "queued");

    let count = app
        .request("GET", "/notices/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.data()["count"], 0);
    assert!(app.outbox.sent().await.is_empty());

    let (_queue, runner) = notice_api::build_worker(&app.state);
    assert_eq!(runner.drain().await.unwrap(), 1);

    let count = app
        .request("GET", "/notices/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.data()["count"], 1);
    assert_eq!(app.outbox.sent().await.len(), 1);
}

#[tokio::test]
async fn test_request_can_override_dispatch_mode() {
    let app = TestApp::new();
    app.create_notice_type("comment", 2).await;
    let ana = app.create_user("ana", None).await;

    let response = app
        .service(
            "POST",
            "/api/send",
            Some(json!({ "users": [ana], "label": "comment", "dispatch": "queued" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert!(response.data()["batch_id"].is_string());
}

#[tokio::test]
async fn test_broadcast_skips_excluded_users() {
    let app = TestApp::new();
    app.create_notice_type("news", 2).await;
    let ana = app.create_user("ana", None).await;
    let bob = app.create_user("bob", None).await;

    let response = app
        .service(
            "POST",
            "/api/broadcast",
            Some(json!({ "label": "news", "exclude": [bob] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["recipients"], 1);

    let ana_count = app
        .request("GET", "/notices/unread-count", None, Some(&app.token(ana, false)))
        .await;
    assert_eq!(ana_count.data()["count"], 1);
    let bob_count = app
        .request("GET", "/notices/unread-count", None, Some(&app.token(bob, false)))
        .await;
    assert_eq!(bob_count.data()["count"], 0);
}
