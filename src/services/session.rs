// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side session state: the signed-in user and its bearer token.
//!
//! Verification codes are placeholders. Any six-character code is accepted and
//! nothing ties it to the phone number; the token is derived from the user id
//! and only correlates requests.

use crate::db::UserDirectory;
use crate::error::{AppError, Result};
use crate::models::{Registration, UserRecord};

/// Prefix of every session token; the remainder is the user id.
pub const TOKEN_PREFIX: &str = "mock-token-";

/// Length of an acceptable verification code.
pub const CODE_LENGTH: usize = 6;

/// Token presented on requests made on behalf of `user_id`.
pub fn token_for(user_id: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, user_id)
}

/// User id a token was issued for, if it is one of ours.
pub fn user_id_from_token(token: &str) -> Option<&str> {
    token
        .strip_prefix(TOKEN_PREFIX)
        .filter(|id| !id.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Rejected,
}

/// The current user and token. At most one session at a time.
#[derive(Debug, Default)]
pub struct SessionManager {
    user: Option<UserRecord>,
    token: Option<String>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a verification code to be sent. Always accepted.
    pub fn request_verification_code(&self, phone: &str) -> Result<()> {
        tracing::info!(phone_len = phone.len(), "Verification code requested");
        Ok(())
    }

    pub fn complete_verification(&self, code: &str) -> Verification {
        if code.chars().count() == CODE_LENGTH {
            Verification::Verified
        } else {
            tracing::debug!("Verification code rejected");
            Verification::Rejected
        }
    }

    pub fn establish_session(&mut self, user: UserRecord) -> &str {
        tracing::info!(user_id = %user.profile.id, "Session established");
        let token = token_for(&user.profile.id);
        self.user = Some(user);
        self.token.insert(token).as_str()
    }

    pub fn current_session(&self) -> Option<(&UserRecord, &str)> {
        self.user.as_ref().zip(self.token.as_deref())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn end_session(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.profile.id, "Session ended");
        }
        self.token = None;
    }

    /// Register a new user and sign them in.
    pub async fn sign_up<D: UserDirectory>(
        &mut self,
        directory: &D,
        registration: Registration,
    ) -> Result<&UserRecord> {
        let user = directory.register(registration).await?;
        self.establish_session(user);
        self.user
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("session not established")))
    }

    /// Sign in an existing user by phone.
    pub async fn log_in<D: UserDirectory>(
        &mut self,
        directory: &D,
        phone: &str,
    ) -> Result<&UserRecord> {
        let user = directory
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::not_found_phone(phone))?;
        self.establish_session(user);
        self.user
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("session not established")))
    }
}
