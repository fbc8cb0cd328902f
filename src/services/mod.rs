// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session, remote API and media.

pub mod media;
pub mod remote;
pub mod session;

pub use media::ReportImageStore;
pub use remote::RemoteDirectory;
pub use session::{SessionManager, Verification};
