// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use ecotrack::config::Config;
use ecotrack::routes::create_router;
use ecotrack::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Admin key configured by `Config::default()`.
#[allow(dead_code)]
pub const ADMIN_KEY: &str = "test_admin_key";

/// Create a test app over empty in-memory stores.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default()));
    (create_router(state.clone()), state)
}

/// Send a request, optionally with a bearer token and JSON body.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// GET `uri` with a bearer token and read the JSON body.
#[allow(dead_code)]
pub async fn get_json(app: &axum::Router, uri: &str, token: &str) -> Value {
    json_body(send(app, "GET", uri, Some(token), None).await).await
}

/// Sign up `phone` and return the issued token.
#[allow(dead_code)]
pub async fn sign_up(app: &axum::Router, phone: &str) -> String {
    let response = send(
        app,
        "POST",
        "/auth/signup",
        None,
        Some(serde_json::json!({
            "phone": phone,
            "fullName": "Ana Lima",
            "address": "12 Green St",
            "householdSize": "3",
            "community": "Riverside"
        })),
    )
    .await;
    assert_eq!(response.status(), 200);
    json_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}
