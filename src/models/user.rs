//! User aggregate: profile, points/level and the nested sub-resource lists.

use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::{BagEntry, RedemptionEntry, ReportEntry, TrainingModule};
use crate::time_utils::now_rfc3339;

/// Citizen level, derived from the point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Level {
    #[serde(rename = "Bronze Citizen")]
    Bronze,
    #[serde(rename = "Silver Citizen")]
    Silver,
    #[serde(rename = "Gold Citizen")]
    Gold,
}

impl Level {
    pub const GOLD_THRESHOLD: u32 = 1000;
    pub const SILVER_THRESHOLD: u32 = 500;
    pub const BRONZE_THRESHOLD: u32 = 100;

    /// Level for a point total.
    ///
    /// Totals below the Bronze threshold are also Bronze.
    #[allow(clippy::if_same_then_else)]
    pub fn from_points(points: u32) -> Self {
        if points >= Self::GOLD_THRESHOLD {
            Level::Gold
        } else if points >= Self::SILVER_THRESHOLD {
            Level::Silver
        } else if points >= Self::BRONZE_THRESHOLD {
            Level::Bronze
        } else {
            Level::Bronze
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Bronze => "Bronze Citizen",
            Level::Silver => "Silver Citizen",
            Level::Gold => "Gold Citizen",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Optional household details collected after sign-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_needs: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waste_preferences: Vec<String>,
}

/// Profile metadata. Stored apart from the sub-resource lists in the KV layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub phone: String,
    pub full_name: String,
    pub address: String,
    pub household_size: String,
    pub community: String,
    #[serde(flatten)]
    pub household: HouseholdDetails,
    pub total_points: u32,
    pub level: Level,
    /// RFC3339
    pub join_date: String,
    /// RFC3339
    pub last_login: String,
}

impl UserProfile {
    /// Fresh profile for a registration: zero points, Bronze, timestamps now.
    pub fn new(registration: Registration) -> Self {
        let now = now_rfc3339();
        Self {
            id: format!("user-{}", uuid::Uuid::new_v4()),
            phone: registration.phone,
            full_name: registration.full_name,
            address: registration.address,
            household_size: registration.household_size,
            community: registration.community,
            household: HouseholdDetails::default(),
            total_points: 0,
            level: Level::Bronze,
            join_date: now.clone(),
            last_login: now,
        }
    }

    /// Add points and recompute the level.
    pub fn credit(&mut self, points: u32) {
        self.total_points = self.total_points.saturating_add(points);
        self.level = Level::from_points(self.total_points);
    }

    /// Spend points. The balance is left untouched when it cannot cover `points`.
    pub fn debit(&mut self, points: u32) -> Result<()> {
        if points > self.total_points {
            return Err(AppError::InsufficientPoints {
                requested: points,
                available: self.total_points,
            });
        }
        self.total_points -= points;
        self.level = Level::from_points(self.total_points);
        Ok(())
    }

    pub fn touch_login(&mut self) {
        self.last_login = now_rfc3339();
    }

    /// Merge the fields present in `update`.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            full_name,
            address,
            household_size,
            community,
            bio,
            emergency_contact,
            emergency_phone,
            special_needs,
            waste_preferences,
        } = update;

        if let Some(v) = full_name {
            self.full_name = v;
        }
        if let Some(v) = address {
            self.address = v;
        }
        if let Some(v) = household_size {
            self.household_size = v;
        }
        if let Some(v) = community {
            self.community = v;
        }
        if bio.is_some() {
            self.household.bio = bio;
        }
        if emergency_contact.is_some() {
            self.household.emergency_contact = emergency_contact;
        }
        if emergency_phone.is_some() {
            self.household.emergency_phone = emergency_phone;
        }
        if special_needs.is_some() {
            self.household.special_needs = special_needs;
        }
        if let Some(v) = waste_preferences {
            self.household.waste_preferences = v;
        }
    }
}

/// The durable per-user aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub bags: Vec<BagEntry>,
    #[serde(default)]
    pub reports: Vec<ReportEntry>,
    #[serde(default)]
    pub rewards: Vec<RedemptionEntry>,
    #[serde(default)]
    pub training: Vec<TrainingModule>,
}

impl UserRecord {
    /// New record with empty lists and the starter training set.
    pub fn new(registration: Registration) -> Self {
        Self {
            profile: UserProfile::new(registration),
            bags: Vec::new(),
            reports: Vec::new(),
            rewards: Vec::new(),
            training: TrainingModule::starter_set(),
        }
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn phone(&self) -> &str {
        &self.profile.phone
    }
}

/// Fields supplied at sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub household_size: String,
    #[serde(default)]
    pub community: String,
}

impl Registration {
    /// Check field limits; `BadRequest` names the offending fields.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::BadRequest(format!("Invalid registration: {}", e)))
    }
}

/// Partial profile update. Absent fields are left as they are.
///
/// Points and level are deliberately absent: they only move through credits,
/// training bonuses and redemptions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_needs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_preferences: Option<Vec<String>>,
}
