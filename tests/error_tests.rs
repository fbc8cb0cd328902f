// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use ecotrack::error::{AppError, ErrorResponse};

async fn body_of(err: AppError) -> (StatusCode, ErrorResponse) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_typed_errors_keep_stable_codes() {
    let (status, body) = body_of(AppError::DuplicatePhone).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.error, AppError::DUPLICATE_PHONE);

    let (status, body) = body_of(AppError::not_found_phone("5550000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error, AppError::NOT_FOUND);
    assert!(body.details.unwrap().contains("5550000000"));

    let (status, body) = body_of(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.error, AppError::UNAUTHORIZED);
    assert!(body.details.is_none());
}

#[tokio::test]
async fn test_insufficient_points_carries_amounts() {
    let (status, body) = body_of(AppError::InsufficientPoints {
        requested: 300,
        available: 120,
    })
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, AppError::INSUFFICIENT_POINTS);
    assert_eq!(body.requested, Some(300));
    assert_eq!(body.available, Some(120));
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let (status, body) = body_of(AppError::Storage("disk on fire".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.details.is_none());

    let (status, body) = body_of(AppError::Internal(anyhow::anyhow!("boom"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "internal_error");
    assert!(body.details.is_none());
}

#[test]
fn test_remote_error_message() {
    let err = AppError::RemoteRequestFailed {
        status: 503,
        message: "maintenance".to_string(),
    };
    assert_eq!(err.code(), "remote_error");
    assert_eq!(
        err.to_string(),
        "Remote request failed with HTTP 503: maintenance"
    );
}
