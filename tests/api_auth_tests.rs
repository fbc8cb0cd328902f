// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without a session token
//! 2. Protected routes accept the token issued at sign-up
//! 3. Admin routes require the admin key
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app();

    let response = common::send(&app, "GET", "/bags", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anon_key_does_not_authenticate() {
    let (app, state) = common::create_test_app();

    let response = common::send(
        &app,
        "GET",
        "/user/profile",
        Some(state.config.public_anon_key.as_str()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_rejected() {
    let (app, _) = common::create_test_app();

    let response = common::send(&app, "GET", "/bags", Some("mock-token-user-missing"), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let (app, _) = common::create_test_app();
    let token = common::sign_up(&app, "5551234567").await;

    let response = common::send(&app, "GET", "/user/profile", Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["profile"]["phone"], "5551234567");
    assert_eq!(body["stats"]["totalPoints"], 0);
}

#[tokio::test]
async fn test_token_stops_working_after_clear() {
    let (app, _) = common::create_test_app();
    let token = common::sign_up(&app, "5551234567").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/clear")
                .header("x-admin-key", common::ADMIN_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = common::send(&app, "GET", "/bags", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_route_requires_key() {
    let (app, _) = common::create_test_app();

    let missing = common::send(&app, "GET", "/admin/users", None, None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/admin/users")
                .header("x-admin-key", "guess")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/bags")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);

    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, _) = common::create_test_app();

    let health = common::send(&app, "GET", "/health", None, None).await;
    assert_eq!(health.status(), StatusCode::OK);

    let catalog = common::send(&app, "GET", "/rewards/available", None, None).await;
    assert_eq!(catalog.status(), StatusCode::OK);
    let body = common::json_body(catalog).await;
    assert_eq!(body["rewards"].as_array().unwrap().len(), 4);
}
