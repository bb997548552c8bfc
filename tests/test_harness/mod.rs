//! Test Harness Module
//!
//! Builds the full router over an in-memory store and mailer in no-op mode,
//! so every test runs without PostgreSQL or SMTP.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use quill_api::config::Config;
use quill_api::models::{Role, User, UserChanges};
use quill_api::repository::{MemoryStore, Store};
use quill_api::services::EmailService;
use quill_api::{build_router, AppState};

pub const PASSWORD: &str = "hunter22";

/// Test Environment
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn Store>,
}

/// A registered, logged-in user.
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::for_memory("integration-test-secret");
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let email = EmailService::new(&config.email).expect("no-op mailer");

        let router = build_router(AppState::new(store.clone(), config, email));

        Self { router, store }
    }

    /// Sends a request and returns the status with the parsed JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    pub async fn register(&self, full_name: &str, email: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/auth",
                None,
                json!({ "fullName": full_name, "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Registers and logs in a user with the default password.
    pub async fn signup(&self, email: &str) -> Session {
        self.register("Test User", email).await;

        let (status, body) = self.login(email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");

        Session {
            id: body["data"]["id"].as_str().unwrap().parse().unwrap(),
            email: email.to_string(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn set_role(&self, id: Uuid, role: Role) {
        self.store
            .update_user(
                id,
                UserChanges {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
    }

    pub async fn user(&self, email: &str) -> User {
        self.store
            .find_user_by_email(email)
            .await
            .unwrap()
            .expect("user exists")
    }

    pub async fn create_tag(&self, token: &str, title: &str) -> Uuid {
        let (status, body) = self.post("/api/tag", Some(token), json!({ "tag": title })).await;
        assert_eq!(status, StatusCode::OK, "tag creation failed: {body}");
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }

    pub async fn create_article(&self, token: &str, title: &str, tags: &[Uuid]) -> Uuid {
        let (status, body) = self
            .post(
                "/api/article",
                Some(token),
                json!({ "title": title, "body": "Some body text", "tags": tags }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "article creation failed: {body}");
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }

    pub async fn create_comment(&self, token: &str, article: Uuid, body: &str) -> Uuid {
        let (status, json) = self
            .post(
                "/api/comments",
                Some(token),
                json!({ "article": article, "body": body }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "comment creation failed: {json}");
        json["data"]["id"].as_str().unwrap().parse().unwrap()
    }
}

/// Asserts the envelope shape and that `statusCode` mirrors the HTTP status.
pub fn assert_envelope(status: StatusCode, body: &Value, code: &str) {
    assert_eq!(body["code"], code, "unexpected body: {body}");
    assert_eq!(body["statusCode"], status.as_u16(), "unexpected body: {body}");
    assert!(body["message"].is_string(), "unexpected body: {body}");
    assert!(body.get("data").is_some(), "unexpected body: {body}");
}
