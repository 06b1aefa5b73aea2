//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use notice_api::{AppState, build_app};
use notice_backend::transport::OutboxTransport;
use notice_core::config::{AppConfig, AuthConfig, StoreProvider};
use notice_core::types::id::UserId;

/// Matches the default `auth.api_key`.
pub const API_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Wired services and stores
    pub state: AppState,
    /// Mail captured instead of sent
    pub outbox: OutboxTransport,
}

/// Status, `Location` header and JSON body of a response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    /// Create a test application on the memory store
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test application after adjusting the default config
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.database.provider = StoreProvider::Memory;
        adjust(&mut config);

        let outbox = OutboxTransport::new();
        let stores = notice_database::Stores::memory();
        let state = AppState::build(config, stores, Arc::new(outbox.clone()))
            .expect("Failed to build app state");
        let router = build_app(state.clone());

        Self {
            router,
            state,
            outbox,
        }
    }

    /// Mint an access token the way the host application does
    pub fn token(&self, user_id: UserId, superuser: bool) -> String {
        let claims = json!({
            "sub": user_id,
            "su": superuser,
            "exp": chrono::Utc::now().timestamp() + 3600,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(AuthConfig::default().jwt_secret.as_bytes()),
        )
        .expect("Failed to sign token")
    }

    /// Mirror a user through the service API and return its id
    pub async fn create_user(&self, username: &str, email: Option<&str>) -> UserId {
        let id = UserId::new();
        let response = self
            .service(
                "PUT",
                "/api/users",
                Some(json!({ "id": id, "username": username, "email": email })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        id
    }

    /// Register a notice type through the service API
    pub async fn create_notice_type(&self, label: &str, default_sensitivity: i32) {
        let response = self
            .service(
                "POST",
                "/api/notice-types",
                Some(json!({
                    "label": label,
                    "display": format!("{label} display"),
                    "description": format!("{label} description"),
                    "default_sensitivity": default_sensitivity,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    }

    /// Send a notice with the API key and return the response
    pub async fn send(&self, users: &[UserId], label: &str, extra: Value) -> TestResponse {
        self.service(
            "POST",
            "/api/send",
            Some(json!({ "users": users, "label": label, "extra_context": extra })),
        )
        .await
    }

    /// Make a service API request carrying the API key
    pub async fn service(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", API_KEY);
        self.send_request(req, json_body(body)).await
    }

    /// Make a user request with an optional bearer token
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send_request(req, json_body(body)).await
    }

    /// Post an urlencoded form with a bearer token
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)], token: &str) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        self.send_request(req, body).await
    }

    async fn send_request(&self, req: axum::http::request::Builder, body: String) -> TestResponse {
        let req = req.body(Body::from(body)).expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            location,
            body,
        }
    }
}

fn json_body(body: Option<Value>) -> String {
    body.map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
        .unwrap_or_default()
}
