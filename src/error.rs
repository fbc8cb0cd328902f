// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Application error type that converts to HTTP responses.
///
/// The same enum is returned by every `UserDirectory` implementer, so UI code
/// handles the in-memory store and the remote facade identically.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Phone number already registered")]
    DuplicatePhone,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u32, available: u32 },

    #[error("Remote request failed with HTTP {status}: {message}")]
    RemoteRequestFailed { status: u16, message: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub const DUPLICATE_PHONE: &'static str = "duplicate_phone";
    pub const NOT_FOUND: &'static str = "not_found";
    pub const UNAUTHORIZED: &'static str = "unauthorized";
    pub const INSUFFICIENT_POINTS: &'static str = "insufficient_points";

    /// Stable machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DuplicatePhone => Self::DUPLICATE_PHONE,
            AppError::NotFound(_) => Self::NOT_FOUND,
            AppError::Unauthorized => Self::UNAUTHORIZED,
            AppError::InsufficientPoints { .. } => Self::INSUFFICIENT_POINTS,
            AppError::RemoteRequestFailed { .. } => "remote_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn not_found_phone(phone: &str) -> Self {
        AppError::NotFound(format!("No user registered with phone {}", phone))
    }
}

/// JSON error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Points asked for and held, on `insufficient_points` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::DuplicatePhone => (StatusCode::CONFLICT, Some(self.to_string())),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Some(msg.clone())),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, None),
            AppError::InsufficientPoints { .. } => {
                (StatusCode::BAD_REQUEST, Some(self.to_string()))
            }
            AppError::RemoteRequestFailed { .. } => {
                (StatusCode::BAD_GATEWAY, Some(self.to_string()))
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Some(msg.clone())),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let (requested, available) = match &self {
            AppError::InsufficientPoints {
                requested,
                available,
            } => (Some(*requested), Some(*available)),
            _ => (None, None),
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            details,
            requested,
            available,
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("JSON encoding failed: {}", err))
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
