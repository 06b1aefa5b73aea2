//! Integration tests for the website inbox views.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn app_with_notice() -> (TestApp, notice_core::types::id::UserId, String) {
    let app = TestApp::new();
    app.create_notice_type("comment", 2).await;
    let ana = app.create_user("ana", Some("ana@example.com")).await;
    let response = app
        .service(
            "POST",
            "/api/send",
            Some(json!({
                "users": [ana],
                "label": "comment",
                "sender": { "content_type": "post", "object_id": "7" },
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let token = app.token(ana, false);
    let list = app.request("GET", "/notices", None, Some(&token)).await;
    let id = list.data()["notices"][0]["id"]
        .as_str()
        .expect("notice id")
        .to_string();
    (app, ana, id)
}

#[tokio::test]
async fn test_inbox_requires_token() {
    let app = TestApp::new();
    let response = app.request("GET", "/notices", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", "/notices", None, Some("garbage")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sent_notice_shows_up_unseen() {
    let (app, ana, _) = app_with_notice().await;
    let token = app.token(ana, false);

    let list = app.request("GET", "/notices", None, Some(&token)).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.data()["notices"].as_array().unwrap().len(), 1);
    assert_eq!(list.data()["unseen"], 1);
    assert_eq!(list.data()["all"], false);

    let count = app
        .request("GET", "/notices/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.data()["count"], 1);
}

#[tokio::test]
async fn test_single_notice_marks_seen_unless_asked_not_to() {
    let (app, ana, id) = app_with_notice().await;
    let token = app.token(ana, false);

    let peek = app
        .request("GET", &format!("/notices/{id}?mark_seen=false"), None, Some(&token))
        .await;
    assert_eq!(peek.status, StatusCode::OK);
    assert_eq!(peek.data()["unseen"], true);

    let read = app
        .request("GET", &format!("/notices/{id}"), None, Some(&token))
        .await;
    assert_eq!(read.data()["unseen"], false);

    let count = app
        .request("GET", "/notices/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.data()["count"], 0);
}

#[tokio::test]
async fn test_other_users_cannot_read_a_notice() {
    let (app, _, id) = app_with_notice().await;
    let bob = app.create_user("bob", None).await;
    let token = app.token(bob, false);

    let response = app
        .request("GET", &format!("/notices/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", &format!("/notices/view/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_sender_redirects_to_local_targets_only() {
    let (app, ana, id) = app_with_notice().await;
    let token = app.token(ana, false);

    let response = app
        .request("GET", &format!("/notices/view/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/post/7/"));

    let response = app
        .request(
            "GET",
            &format!("/notices/view/{id}?sender_url=/custom/page/"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/custom/page/"));

    let response = app
        .request(
            "GET",
            &format!("/notices/view/{id}?sender_url=https://evil.test/"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/post/7/"));

    let count = app
        .request("GET", "/notices/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.data()["count"], 0);
}

#[tokio::test]
async fn test_archive_is_ignored_for_strangers_and_allowed_for_superusers() {
    let (app, ana, id) = app_with_notice().await;
    let bob = app.create_user("bob", None).await;
    let ana_token = app.token(ana, false);

    let response = app
        .request(
            "POST",
            &format!("/notices/{id}/archive"),
            None,
            Some(&app.token(bob, false)),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/notices"));
    let list = app.request("GET", "/notices", None, Some(&ana_token)).await;
    assert_eq!(list.data()["notices"].as_array().unwrap().len(), 1);

    let admin = app.create_user("admin", None).await;
    let response = app
        .request(
            "POST",
            &format!("/notices/{id}/archive?next_page=/inbox/"),
            None,
            Some(&app.token(admin, true)),
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/inbox/"));

    let list = app.request("GET", "/notices", None, Some(&ana_token)).await;
    assert!(list.data()["notices"].as_array().unwrap().is_empty());

    let all = app
        .request("GET", "/notices/all", None, Some(&ana_token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.data()["total_items"], 0);
}

#[tokio::test]
async fn test_delete_and_mark_all_seen() {
    let (app, ana, id) = app_with_notice().await;
    let token = app.token(ana, false);

    let response = app
        .request("POST", "/notices/mark_all_seen", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/notices"));
    let count = app
        .request("GET", "/notices/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.data()["count"], 0);

    let response = app
        .request("POST", &format!("/notices/{id}/delete"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let response = app
        .request("GET", &format!("/notices/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_emailed_links_resolve() {
    let (app, ana, id) = app_with_notice().await;
    let token = app.token(ana, false);
    let root_url = app.state.config.notification.root_url().to_string();

    let sent = app.outbox.sent().await;
    assert_eq!(sent.len(), 1);
    let notices_url = sent[0]
        .body
        .lines()
        .find_map(|line| line.strip_prefix("See all your notices at "))
        .expect("notices link in email body")
        .trim()
        .to_string();
    let path = notices_url
        .strip_prefix(&root_url)
        .expect("link under root url");

    let inbox = app.request("GET", path, None, Some(&token)).await;
    assert_eq!(inbox.status, StatusCode::OK);
    assert_eq!(inbox.data()["notices"][0]["id"], id.as_str());

    let view = format!("{root_url}/notices/view/{id}");
    assert!(sent[0].body.contains(&view));
    let response = app
        .request("GET", &format!("/notices/view/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}
