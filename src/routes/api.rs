// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::db::UserDirectory;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::reward::{catalog, find_offer};
use crate::services::media::MAX_IMAGE_BYTES;
use crate::models::{
    BagEntry, Coordinates, NewBag, NewRedemption, NewReport, ProfileStats, ProfileUpdate,
    RedemptionEntry, ReportEntry, ReportKind, RewardOffer, TrainingModule, TrainingProgress,
    TrainingUpdate, UserProfile, UserRecord,
};
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body limit for report submissions: a base64 image at the size cap plus the
/// surrounding JSON.
pub const REPORT_BODY_LIMIT: usize = MAX_IMAGE_BYTES * 4 / 3 + 64 * 1024;

/// API routes (require a session token).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/profile", get(get_profile))
        .route("/user/profile/update", post(update_profile))
        .route("/user/household/update", post(update_household))
        .route("/bags", get(get_bags))
        .route("/bags/add", post(add_bag))
        .route("/reports", get(get_reports))
        .route(
            "/reports/submit",
            post(submit_report).layer(DefaultBodyLimit::max(REPORT_BODY_LIMIT)),
        )
        .route("/rewards", get(get_redemptions))
        .route("/rewards/add", post(add_redemption))
        .route("/rewards/redeem", post(redeem_reward))
        .route("/training", get(get_training))
        .route("/training/update", post(update_training))
}

/// Public catalog route.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/rewards/available", get(get_available_rewards))
}

// ─── Profile ─────────────────────────────────────────────────

/// Dashboard payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub stats: ProfileStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserUpdatedResponse {
    pub success: bool,
    pub user: UserRecord,
}

/// Household fields editable from the household dialog.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdUpdate {
    pub address: Option<String>,
    pub household_size: Option<String>,
    pub community: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub special_needs: Option<String>,
    pub waste_preferences: Option<Vec<String>>,
}

impl From<HouseholdUpdate> for ProfileUpdate {
    fn from(h: HouseholdUpdate) -> Self {
        ProfileUpdate {
            address: h.address,
            household_size: h.household_size,
            community: h.community,
            emergency_contact: h.emergency_contact,
            emergency_phone: h.emergency_phone,
            special_needs: h.special_needs,
            waste_preferences: h.waste_preferences,
            ..Default::default()
        }
    }
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let record = state
        .directory
        .find_by_id(&user.user_id)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let stats = ProfileStats::from_record(&record);
    Ok(Json(ProfileResponse {
        profile: record.profile,
        stats,
    }))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserUpdatedResponse>> {
    let user = state.directory.update(&user.phone, update).await?;
    Ok(Json(UserUpdatedResponse {
        success: true,
        user,
    }))
}

async fn update_household(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<HouseholdUpdate>,
) -> Result<Json<UserUpdatedResponse>> {
    let user = state.directory.update(&user.phone, update.into()).await?;
    Ok(Json(UserUpdatedResponse {
        success: true,
        user,
    }))
}

// ─── Bags ────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct BagsResponse {
    pub bags: Vec<BagEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BagAddedResponse {
    pub success: bool,
    pub bag: BagEntry,
}

async fn get_bags(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<BagsResponse>> {
    let bags = state.directory.list(&user.user_id)?;
    Ok(Json(BagsResponse { bags }))
}

async fn add_bag(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(bag): Json<NewBag>,
) -> Result<Json<BagAddedResponse>> {
    let bag = state.directory.append_bag(&user.phone, bag).await?;
    tracing::info!(user_id = %user.user_id, bag_id = %bag.id, "Bag scanned");
    Ok(Json(BagAddedResponse { success: true, bag }))
}

// ─── Reports ─────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportsResponse {
    pub reports: Vec<ReportEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportSubmittedResponse {
    pub success: bool,
    pub report: ReportEntry,
}

/// Report as sent by the app; the photo may be inline.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    pub location: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

async fn get_reports(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ReportsResponse>> {
    let reports = state.directory.list(&user.user_id)?;
    Ok(Json(ReportsResponse { reports }))
}

async fn submit_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(submission): Json<ReportSubmission>,
) -> Result<Json<ReportSubmittedResponse>> {
    let image_url = match submission.image_base64.as_deref() {
        Some(encoded) if !encoded.is_empty() => Some(state.media.upload_base64(encoded)?),
        _ => submission.image_url,
    };

    let report = state
        .directory
        .append_report(
            &user.phone,
            NewReport {
                location: submission.location,
                kind: submission.kind,
                image_url,
                coordinates: submission.coordinates,
            },
        )
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        report_id = %report.id,
        has_image = report.image_url.is_some(),
        "Report submitted"
    );
    Ok(Json(ReportSubmittedResponse {
        success: true,
        report,
    }))
}

// ─── Rewards ─────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub rewards: Vec<RewardOffer>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedemptionsResponse {
    pub rewards: Vec<RedemptionEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedemptionAddedResponse {
    pub success: bool,
    pub redemption: RedemptionEntry,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub reward_id: u32,
    pub points: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub success: bool,
    pub redemption: RedemptionEntry,
    pub new_points: u32,
}

async fn get_available_rewards() -> Json<CatalogResponse> {
    Json(CatalogResponse { rewards: catalog() })
}

async fn get_redemptions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RedemptionsResponse>> {
    let rewards = state.directory.list(&user.user_id)?;
    Ok(Json(RedemptionsResponse { rewards }))
}

async fn add_redemption(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<NewRedemption>,
) -> Result<Json<RedemptionAddedResponse>> {
    let redemption = state.directory.append_reward(&user.phone, draft).await?;
    Ok(Json(RedemptionAddedResponse {
        success: true,
        redemption,
    }))
}

/// Spend points on a reward. Catalog rewards must be redeemed at their price.
async fn redeem_reward(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>> {
    if let Some(offer) = find_offer(req.reward_id) {
        if offer.points != req.points {
            return Err(AppError::BadRequest(format!(
                "Reward {} costs {} points",
                offer.id, offer.points
            )));
        }
    }

    let redemption = state
        .directory
        .redeem(&user.phone, req.reward_id, req.points)
        .await?;

    let new_points = state
        .directory
        .find_profile(&user.user_id)?
        .map(|p| p.total_points)
        .unwrap_or_default();

    Ok(Json(RedeemResponse {
        success: true,
        redemption,
        new_points,
    }))
}

// ─── Training ────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResponse {
    pub training: Vec<TrainingModule>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingUpdatedResponse {
    pub success: bool,
    #[serde(flatten)]
    pub update: TrainingUpdate,
}

async fn get_training(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TrainingResponse>> {
    let training = state.directory.list(&user.user_id)?;
    Ok(Json(TrainingResponse { training }))
}

async fn update_training(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<TrainingProgress>,
) -> Result<Json<TrainingUpdatedResponse>> {
    if req.progress > 100 {
        return Err(AppError::BadRequest(
            "Progress must be between 0 and 100".to_string(),
        ));
    }

    let update = state
        .directory
        .set_training_progress(&user.phone, &req.module_name, req.progress)
        .await?;

    Ok(Json(TrainingUpdatedResponse {
        success: true,
        update,
    }))
}
