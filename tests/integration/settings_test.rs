//! Integration tests for notification settings.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_settings_table_uses_lazy_defaults() {
    let app = TestApp::new();
    app.create_notice_type("comment", 2).await;
    app.create_notice_type("digest", 1).await;
    let ana = app.create_user("ana", Some("ana@example.com")).await;

    let response = app
        .request("GET", "/notices/settings", None, Some(&app.token(ana, false)))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["column_headers"], json!(["On site", "Email"]));

    let rows = response.data()["rows"].as_array().unwrap();
    let cells = |label: &str| {
        rows.iter()
            .find(|r| r["notice_type"]["label"] == label)
            .map(|r| r["cells"].clone())
            .unwrap()
    };
    assert_eq!(cells("comment"), json!([["comment_1", true], ["comment_2", true]]));
    assert_eq!(cells("digest"), json!([["digest_1", true], ["digest_2", false]]));
}

#[tokio::test]
async fn test_settings_form_turns_email_off() {
    let app = TestApp::new();
    app.create_notice_type("comment", 2).await;
    let ana = app.create_user("ana", Some("ana@example.com")).await;
    let token = app.token(ana, false);

    let response = app
        .post_form(
            "/notices/settings",
            &[("comment_1", "on"), ("next_page", "/account/")],
            &token,
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/account/"));

    let sent = app.send(&[ana], "comment", json!({})).await;
    assert_eq!(sent.status, StatusCode::OK);
    assert!(app.outbox.sent().await.is_empty());

    let list = app.request("GET", "/notices", None, Some(&token)).await;
    assert_eq!(list.data()["notices"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_settings_form_ignores_offsite_next_page() {
    let app = TestApp::new();
    app.create_notice_type("comment", 2).await;
    let ana = app.create_user("ana", None).await;

    let response = app
        .post_form(
            "/notices/settings",
            &[("comment_1", "on"), ("next_page", "https://evil.test/")],
            &app.token(ana, false),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/notices/settings"));
}
