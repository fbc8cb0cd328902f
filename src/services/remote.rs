// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the EcoTrack service.
//!
//! [`RemoteDirectory`] speaks the same `UserDirectory` contract as the local
//! stores. It acts for one signed-in phone at a time: `register` and a
//! successful `find_by_phone` adopt the returned token, and calls for any other
//! phone fail with `NotFound` before a request is sent. Without a session the
//! anonymous public key is presented.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::config::RemoteConfig;
use crate::db::UserDirectory;
use crate::error::{AppError, ErrorResponse, Result};
use crate::middleware::admin_auth::ADMIN_KEY_HEADER;
use crate::models::{
    BagEntry, NewBag, NewRedemption, NewReport, ProfileUpdate, RedemptionEntry, Registration,
    ReportEntry, RewardOffer, TrainingModule, TrainingProgress, TrainingUpdate, UserRecord,
};
use crate::routes::admin::UsersResponse;
use crate::routes::api::{
    BagAddedResponse, BagsResponse, CatalogResponse, ProfileResponse, RedeemRequest,
    RedeemResponse, RedemptionAddedResponse, RedemptionsResponse, ReportSubmission,
    ReportSubmittedResponse, ReportsResponse, TrainingResponse, TrainingUpdatedResponse,
    UserUpdatedResponse,
};
use crate::routes::auth::{LoginRequest, SessionResponse};
use crate::routes::SuccessResponse;

#[derive(Debug, Clone)]
struct RemoteSession {
    phone: String,
    token: String,
}

/// `UserDirectory` backed by the HTTP service.
pub struct RemoteDirectory {
    http: reqwest::Client,
    config: RemoteConfig,
    session: RwLock<Option<RemoteSession>>,
}

impl RemoteDirectory {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            config,
            session: RwLock::new(None),
        })
    }

    /// Act for `phone` with an already issued token.
    pub async fn set_session(&self, phone: &str, token: &str) {
        *self.session.write().await = Some(RemoteSession {
            phone: phone.to_string(),
            token: token.to_string(),
        });
    }

    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    /// Token of the current session, if any.
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.token.clone())
    }

    // ─── Reads for the signed-in user ────────────────────────

    pub async fn profile(&self) -> Result<ProfileResponse> {
        self.get_json("/user/profile").await
    }

    pub async fn bags(&self) -> Result<Vec<BagEntry>> {
        let body: BagsResponse = self.get_json("/bags").await?;
        Ok(body.bags)
    }

    pub async fn reports(&self) -> Result<Vec<ReportEntry>> {
        let body: ReportsResponse = self.get_json("/reports").await?;
        Ok(body.reports)
    }

    pub async fn redemptions(&self) -> Result<Vec<RedemptionEntry>> {
        let body: RedemptionsResponse = self.get_json("/rewards").await?;
        Ok(body.rewards)
    }

    pub async fn training(&self) -> Result<Vec<TrainingModule>> {
        let body: TrainingResponse = self.get_json("/training").await?;
        Ok(body.training)
    }

    pub async fn available_rewards(&self) -> Result<Vec<RewardOffer>> {
        let body: CatalogResponse = self.get_json("/rewards/available").await?;
        Ok(body.rewards)
    }

    // ─── Plumbing ────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn bearer(&self) -> String {
        match self.session.read().await.as_ref() {
            Some(session) => session.token.clone(),
            None => self.config.anon_key.clone(),
        }
    }

    /// Reject calls for a phone other than the signed-in one.
    async fn ensure_phone(&self, phone: &str) -> Result<()> {
        match self.session.read().await.as_ref() {
            Some(session) if session.phone != phone => {
                tracing::debug!("Remote call for a phone outside the session");
                Err(AppError::not_found_phone(phone))
            }
            _ => Ok(()),
        }
    }

    fn admin_key(&self) -> Result<&str> {
        self.config.admin_key.as_deref().ok_or(AppError::Unauthorized)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.get(self.url(path)).bearer_auth(self.bearer().await);
        self.send_json(request).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self
            .http
            .post(self.url(path))
            .bearer_auth(self.bearer().await)
            .json(body);
        self.send_json(request).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Remote request failed");
            AppError::RemoteRequestFailed {
                status: 0,
                message: e.to_string(),
            }
        })?;
        let response = check_response(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::RemoteRequestFailed {
                status: 0,
                message: format!("Invalid response body: {}", e),
            })
    }

    async fn adopt_session(&self, body: &SessionResponse) {
        self.set_session(body.user.phone(), &body.token).await;
    }
}

/// Map a non-2xx response back onto the error the service raised.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();
    let code = parsed.as_ref().map(|e| e.error.clone());

    match (status, code.as_deref()) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => Err(AppError::Unauthorized),
        (StatusCode::CONFLICT, Some(AppError::DUPLICATE_PHONE)) => Err(AppError::DuplicatePhone),
        (StatusCode::NOT_FOUND, Some(AppError::NOT_FOUND)) => Err(AppError::NotFound(
            parsed.and_then(|e| e.details).unwrap_or_default(),
        )),
        (StatusCode::BAD_REQUEST, Some(AppError::INSUFFICIENT_POINTS)) => {
            let (requested, available) = parsed
                .map(|e| (e.requested.unwrap_or_default(), e.available.unwrap_or_default()))
                .unwrap_or_default();
            Err(AppError::InsufficientPoints {
                requested,
                available,
            })
        }
        _ => {
            tracing::warn!(status = status.as_u16(), "Remote service returned an error");
            Err(AppError::RemoteRequestFailed {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

impl UserDirectory for RemoteDirectory {
    async fn register(&self, registration: Registration) -> Result<UserRecord> {
        let body: SessionResponse = self.post_json("/auth/signup", &registration).await?;
        self.adopt_session(&body).await;
        Ok(body.user)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>> {
        let request = LoginRequest {
            phone: phone.to_string(),
        };
        match self
            .post_json::<_, SessionResponse>("/auth/login", &request)
            .await
        {
            Ok(body) => {
                self.adopt_session(&body).await;
                Ok(Some(body.user))
            }
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update(&self, phone: &str, update: ProfileUpdate) -> Result<UserRecord> {
        self.ensure_phone(phone).await?;
        let body: UserUpdatedResponse = self.post_json("/user/profile/update", &update).await?;
        Ok(body.user)
    }

    async fn append_bag(&self, phone: &str, bag: NewBag) -> Result<BagEntry> {
        self.ensure_phone(phone).await?;
        let body: BagAddedResponse = self.post_json("/bags/add", &bag).await?;
        Ok(body.bag)
    }

    async fn append_report(&self, phone: &str, report: NewReport) -> Result<ReportEntry> {
        self.ensure_phone(phone).await?;
        let submission = ReportSubmission {
            location: report.location,
            kind: report.kind,
            image_base64: None,
            image_url: report.image_url,
            coordinates: report.coordinates,
        };
        let body: ReportSubmittedResponse = self.post_json("/reports/submit", &submission).await?;
        Ok(body.report)
    }

    async fn append_reward(&self, phone: &str, reward: NewRedemption) -> Result<RedemptionEntry> {
        self.ensure_phone(phone).await?;
        let body: RedemptionAddedResponse = self.post_json("/rewards/add", &reward).await?;
        Ok(body.redemption)
    }

    async fn set_training_progress(
        &self,
        phone: &str,
        module_name: &str,
        progress: u32,
    ) -> Result<TrainingUpdate> {
        self.ensure_phone(phone).await?;
        let request = TrainingProgress {
            module_name: module_name.to_string(),
            progress: progress.min(100),
        };
        let body: TrainingUpdatedResponse = self.post_json("/training/update", &request).await?;
        Ok(body.update)
    }

    async fn redeem(&self, phone: &str, reward_id: u32, points: u32) -> Result<RedemptionEntry> {
        self.ensure_phone(phone).await?;
        let body: RedeemResponse = self
            .post_json("/rewards/redeem", &RedeemRequest { reward_id, points })
            .await?;
        tracing::debug!(new_points = body.new_points, "Remote redemption accepted");
        Ok(body.redemption)
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>> {
        let request = self
            .http
            .get(self.url("/admin/users"))
            .header(ADMIN_KEY_HEADER, self.admin_key()?);
        let body: UsersResponse = self.send_json(request).await?;
        Ok(body.users)
    }

    async fn clear(&self) -> Result<()> {
        let request = self
            .http
            .post(self.url("/admin/clear"))
            .header(ADMIN_KEY_HEADER, self.admin_key()?);
        let body: SuccessResponse = self.send_json(request).await?;
        if !body.success {
            return Err(AppError::RemoteRequestFailed {
                status: 200,
                message: body.error.unwrap_or_default(),
            });
        }
        self.clear_session().await;
        Ok(())
    }
}
