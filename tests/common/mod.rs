// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use argon2::Params;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use student_activity::config::Config;
use student_activity::db::MemoryStore;
use student_activity::routes::create_router;
use student_activity::services::Argon2Hasher;
use student_activity::AppState;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub const PASSWORD: &str = "correct horse battery staple";

/// Create a test app backed by an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    // Cheap Argon2 parameters keep signup/login fast in debug builds.
    let hasher = Argon2Hasher::with_params(Params::new(1024, 1, 1, None).unwrap());
    let state = Arc::new(AppState::with_hasher(
        Config::test_default(),
        Arc::new(MemoryStore::new()),
        Arc::new(hasher),
    ));
    (create_router(state.clone()), state)
}

/// Build a request with an optional bearer token and optional JSON body.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Send a request and decode the JSON body (`Value::Null` when empty).
#[allow(dead_code)]
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// The `Set-Cookie` directive for `name`, panicking when absent.
#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

/// Value part of a `name=value; ...` directive.
#[allow(dead_code)]
pub fn cookie_value(directive: &str) -> String {
    let pair = directive.split(';').next().unwrap();
    pair.split_once('=').unwrap().1.to_string()
}

#[allow(dead_code)]
pub async fn signup(app: &Router, email: &str) -> Uuid {
    let (status, body) = send_json(
        app,
        request(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": email,
                "password": PASSWORD,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Sign up and log in. Returns the student id and an access token.
#[allow(dead_code)]
pub async fn signup_and_login(app: &Router, email: &str) -> (Uuid, String) {
    let id = signup(app, email).await;
    let (status, body) = send_json(
        app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (id, body["token"].as_str().unwrap().to_string())
}

/// Record an activity and return its id.
#[allow(dead_code)]
pub async fn create_activity(
    app: &Router,
    token: &str,
    activity: &str,
    description: &str,
    timestamp: &str,
) -> Uuid {
    let (status, body) = send_json(
        app,
        request(
            "POST",
            "/activities",
            Some(token),
            Some(json!({
                "activity": activity,
                "description": description,
                "timestamp": timestamp,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().parse().unwrap()
}
