// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrative routes (admin key required).

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::UserDirectory;
use crate::error::Result;
use crate::models::UserRecord;
use crate::routes::SuccessResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/clear", post(clear_users))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserRecord>,
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<UsersResponse>> {
    let users = state.directory.list_all().await?;
    Ok(Json(UsersResponse { users }))
}

/// Wipe every user and stored image.
async fn clear_users(State(state): State<Arc<AppState>>) -> Result<Json<SuccessResponse>> {
    tracing::warn!("Admin requested full reset");
    state.directory.clear().await?;
    state.media.clear();
    Ok(Json(SuccessResponse::ok()))
}
