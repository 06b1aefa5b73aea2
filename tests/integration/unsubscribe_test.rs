//! Integration tests for one-click unsubscribe links.

use axum::http::StatusCode;
use serde_json::json;

use notice_core::config::AuthConfig;
use notice_service::UnsubscribeSigner;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_unsubscribe_stops_email() {
    let app = TestApp::new();
    app.create_notice_type("comment", 2).await;
    let ana = app.create_user("ana", Some("ana@example.com")).await;

    app.send(&[ana], "comment", json!({})).await;
    assert_eq!(app.outbox.sent().await.len(), 1);

    let code = UnsubscribeSigner::new(&AuthConfig::default())
        .sign(ana)
        .unwrap();
    let response = app
        .request("GET", &format!("/notices/unsubscribe/email/{code}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["medium"], "email");
    assert_eq!(
        response.data()["message"],
        "Your email address (ana@example.com) will no longer receive any other email notification from us."
    );

    app.send(&[ana], "comment", json!({})).await;
    assert_eq!(app.outbox.sent().await.len(), 1);
}

#[tokio::test]
async fn test_unsubscribe_rejects_bad_links() {
    let app = TestApp::new();
    let ana = app.create_user("ana", Some("ana@example.com")).await;
    let code = UnsubscribeSigner::new(&AuthConfig::default())
        .sign(ana)
        .unwrap();

    let response = app
        .request("GET", &format!("/notices/unsubscribe/email/{code}x"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", &format!("/notices/unsubscribe/pigeon/{code}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
