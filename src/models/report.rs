//! Litter reports.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::{entry_id, today};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ReportKind {
    #[serde(rename = "Illegal Dumping")]
    IllegalDumping,
    #[serde(rename = "Overflowing Bin")]
    OverflowingBin,
    #[serde(rename = "Littering")]
    Littering,
    #[serde(rename = "Hazardous Waste")]
    HazardousWaste,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ReportStatus {
    Pending,
    Investigating,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReportEntry {
    pub id: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub status: ReportStatus,
    /// YYYY-MM-DD
    pub date: String,
    /// Zero until the report is verified
    pub points: u32,
}

/// Report fields supplied by the user. Images are already uploaded by the time
/// a draft reaches a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub location: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl ReportEntry {
    pub fn from_draft(draft: NewReport) -> Self {
        Self {
            id: entry_id("RPT"),
            location: draft.location,
            kind: draft.kind,
            image_url: draft.image_url,
            coordinates: draft.coordinates,
            status: ReportStatus::Pending,
            date: today(),
            points: 0,
        }
    }
}
