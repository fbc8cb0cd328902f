// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! EcoTrack: gamified household waste management
//!
//! This crate provides the user record store (in-memory, KV-backed and
//! remote), the client session shim and the HTTP service behind the mobile
//! app: bag scans, litter reports, training modules and point redemptions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{KvDirectory, KvStore};
use services::ReportImageStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub directory: KvDirectory,
    pub media: ReportImageStore,
}

impl AppState {
    /// Empty stores for the given configuration.
    pub fn new(config: Config) -> Self {
        let media = ReportImageStore::new(&config.public_url);
        Self {
            config,
            directory: KvDirectory::new(KvStore::new()),
            media,
        }
    }
}
