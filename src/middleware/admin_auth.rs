// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin key middleware for `/admin/*` routes.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header carrying the shared admin key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Require the configured admin key.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let presented = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match presented {
        Some(key) if !state.config.admin_key.is_empty() && key == state.config.admin_key => {
            Ok(next.run(request).await)
        }
        Some(_) => {
            tracing::warn!("Blocked admin request with wrong key");
            Err(StatusCode::FORBIDDEN)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
