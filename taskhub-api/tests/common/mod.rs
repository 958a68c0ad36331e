//! Common test utilities for integration tests
//!
//! Builds the full router over the in-memory store and the recording
//! mailer, so these tests need no database or mail relay.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use taskhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskhub_shared::{mail::memory::MemoryMailer, store::memory::InMemoryStore};
use tower::Service;
use uuid::Uuid;

pub const PASSWORD: &str = "C0rrect-Horse";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: InMemoryStore,
    pub mailer: MemoryMailer,
    pub app: Router,
}

/// A confirmed, logged-in user
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestContext {
    /// Creates a context with an empty store and outbox
    pub fn new() -> Self {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgresql://unused/taskhub_test"),
            ("JWT_SECRET", "test-secret-key-at-least-32-bytes-long"),
            ("FRONTEND_URL", "http://frontend.test"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_vars(|key| vars.get(key).map(|v| v.to_string()))
            .expect("test config");

        let store = InMemoryStore::new();
        let mailer = MemoryMailer::new();
        let app = build_router(AppState::new(
            Arc::new(store.clone()),
            Arc::new(mailer.clone()),
            config,
        ));

        Self { store, mailer, app }
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a request and decodes the JSON body (`Null` when empty)
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };

        (status, json)
    }

    /// Token from the last link mailed to `email`
    pub fn mailed_token(&self, email: &str) -> String {
        let mail = self.mailer.last_to(email).expect("no mail sent");
        mail.text.rsplit('/').next().unwrap().trim().to_string()
    }

    /// Registers, confirms and logs in a user
    pub async fn login_user(&self, name: &str) -> TestUser {
        let email = format!("{}@example.com", name.to_lowercase());

        let (status, body) = self
            .send_json(json_request(
                Method::POST,
                "/v1/auth/register",
                None,
                serde_json::json!({ "name": name, "email": email, "password": PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let token = self.mailed_token(&email);
        let (status, _) = self
            .send_json(empty_request(
                Method::GET,
                &format!("/v1/auth/confirm/{}", token),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self
            .send_json(json_request(
                Method::POST,
                "/v1/auth/login",
                None,
                serde_json::json!({ "email": email, "password": PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            email,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a project owned by `user` and returns its id
    pub async fn create_project(&self, user: &TestUser, name: &str) -> Uuid {
        let (status, body) = self
            .send_json(json_request(
                Method::POST,
                "/v1/projects",
                Some(&user.token),
                serde_json::json!({ "name": name, "client": "ACME" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create project failed: {}", body);

        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Creates a task in `project` and returns its id
    pub async fn create_task(&self, user: &TestUser, project: Uuid, name: &str) -> Uuid {
        let (status, body) = self
            .send_json(json_request(
                Method::POST,
                "/v1/tasks",
                Some(&user.token),
                serde_json::json!({ "name": name, "project": project }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);

        body["id"].as_str().unwrap().parse().unwrap()
    }
}

/// Request with a JSON body
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Request without a body
pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}
