// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-up and log-in routes (public).

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::UserDirectory;
use crate::error::{AppError, Result};
use crate::models::{Registration, UserRecord};
use crate::services::session::token_for;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

/// A user record plus the token to present on later requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user: UserRecord,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
}

/// Register a new user.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<Registration>,
) -> Result<Json<SessionResponse>> {
    let user = state.directory.register(registration).await?;
    let token = token_for(user.id());

    Ok(Json(SessionResponse {
        success: true,
        user,
        token,
    }))
}

/// Log in a returning user by phone. The verification code step happens on
/// the client.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let user = state
        .directory
        .find_by_phone(&req.phone)
        .await?
        .ok_or_else(|| AppError::not_found_phone(&req.phone))?;

    tracing::info!(user_id = %user.profile.id, "User logged in");
    let token = token_for(user.id());

    Ok(Json(SessionResponse {
        success: true,
        user,
        token,
    }))
}
