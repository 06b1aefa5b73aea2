//! Integration tests for observations.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_observe_check_and_list() {
    let app = TestApp::new();
    app.create_notice_type("reply", 2).await;
    app.create_notice_type("edit", 2).await;
    let ana = app.create_user("ana", None).await;

    let response = app
        .service(
            "POST",
            "/api/observations",
            Some(json!({
                "user_id": ana,
                "content_type": "post",
                "object_id": "1",
                "labels": ["reply", "edit"],
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["changed"], 2);

    let check = app
        .service(
            "GET",
            &format!("/api/observations/check?user_id={ana}&content_type=post&object_id=1&labels=reply,edit"),
            None,
        )
        .await;
    assert_eq!(check.data()["observing"], true);

    let check = app
        .service(
            "GET",
            "/api/observations/check?content_type=post&object_id=1&labels=reply",
            None,
        )
        .await;
    assert_eq!(check.data()["observing"], false);

    let list = app
        .service("GET", &format!("/api/observations/{ana}/post?labels=reply"), None)
        .await;
    assert_eq!(list.data(), &json!([{ "content_type": "post", "object_id": "1" }]));
}

#[tokio::test]
async fn test_notify_observers_and_forget_object() {
    let app = TestApp::new();
    app.create_notice_type("reply", 2).await;
    let ana = app.create_user("ana", None).await;
    let bob = app.create_user("bob", None).await;
    for user in [ana, bob] {
        app.service(
            "POST",
            "/api/observations",
            Some(json!({
                "user_id": user,
                "content_type": "post",
                "object_id": "9",
                "labels": ["reply"],
            })),
        )
        .await;
    }

    let response = app
        .service(
            "POST",
            "/api/observations/notify",
            Some(json!({
                "content_type": "post",
                "object_id": "9",
                "label": "reply",
                "exclude": [bob],
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data().as_array().unwrap().len(), 1);

    let ana_token = app.token(ana, false);
    let list = app.request("GET", "/notices", None, Some(&ana_token)).await;
    let notice = &list.data()["notices"][0];
    assert_eq!(notice["sender_content_type"], "post");
    assert_eq!(notice["sender_path"], "/post/9/");

    let forgotten = app.service("DELETE", "/api/objects/post/9", None).await;
    assert_eq!(forgotten.data()["changed"], 2);

    let check = app
        .service(
            "GET",
            &format!("/api/observations/check?user_id={ana}&content_type=post&object_id=9&labels=reply"),
            None,
        )
        .await;
    assert_eq!(check.data()["observing"], false);
}

#[tokio::test]
async fn test_stop_observing() {
    let app = TestApp::new();
    app.create_notice_type("reply", 2).await;
    let ana = app.create_user("ana", None).await;
    let body = json!({
        "user_id": ana,
        "content_type": "post",
        "object_id": "3",
        "labels": ["reply"],
    });
    app.service("POST", "/api/observations", Some(body.clone())).await;

    let response = app.service("DELETE", "/api/observations", Some(body)).await;
    assert_eq!(response.data()["changed"], 1);
}
