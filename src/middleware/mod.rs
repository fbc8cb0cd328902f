// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (session and admin authentication).

pub mod admin_auth;
pub mod auth;

pub use admin_auth::require_admin;
pub use auth::require_auth;
