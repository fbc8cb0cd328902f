//! Waste bag scans.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::{entry_id, today};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum BagStatus {
    Pending,
    Collected,
    Rejected,
}

/// One scanned bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BagEntry {
    pub id: String,
    /// Waste stream (e.g. "Recyclables")
    #[serde(rename = "type")]
    pub kind: String,
    /// Weight as entered by the user (e.g. "2.5 kg")
    pub weight: String,
    pub qr_code: String,
    pub status: BagStatus,
    pub score: u32,
    /// YYYY-MM-DD
    pub date: String,
}

/// Bag fields supplied by the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBag {
    #[serde(rename = "type")]
    pub kind: String,
    pub weight: String,
    pub qr_code: String,
}

impl BagEntry {
    /// Pending, unscored entry dated today.
    pub fn from_draft(draft: NewBag) -> Self {
        Self {
            id: entry_id("BG"),
            kind: draft.kind,
            weight: draft.weight,
            qr_code: draft.qr_code,
            status: BagStatus::Pending,
            score: 0,
            date: today(),
        }
    }
}
