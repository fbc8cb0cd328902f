//! Reward catalog and redemption records.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::{entry_id, today};

/// Something points can be spent on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RewardOffer {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub points: u32,
    pub category: String,
    pub available: bool,
}

/// Offers currently on the rewards tab.
pub fn catalog() -> Vec<RewardOffer> {
    let offer = |id, name: &str, description: &str, points, category: &str| RewardOffer {
        id,
        name: name.to_string(),
        description: description.to_string(),
        points,
        category: category.to_string(),
        available: true,
    };

    vec![
        offer(
            1,
            "Coffee Voucher",
            "1 free coffee at partner cafes",
            150,
            "Food & Drink",
        ),
        offer(
            2,
            "Eco-friendly Bag",
            "Reusable shopping bag made from recycled materials",
            300,
            "Eco Products",
        ),
        offer(3, "Tree Planting", "Plant a tree in your name", 500, "Environment"),
        offer(4, "Phone Credit", "$5 mobile phone credit", 250, "Utilities"),
    ]
}

/// Look up a catalog offer by id.
pub fn find_offer(reward_id: u32) -> Option<RewardOffer> {
    catalog().into_iter().find(|o| o.id == reward_id)
}

/// A completed redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RedemptionEntry {
    pub id: String,
    pub reward_id: u32,
    /// Points spent
    pub points: u32,
    /// YYYY-MM-DD
    pub date: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRedemption {
    pub reward_id: u32,
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RedemptionEntry {
    pub const REDEEMED: &'static str = "redeemed";

    pub fn from_draft(draft: NewRedemption) -> Self {
        Self {
            id: entry_id("RDM"),
            reward_id: draft.reward_id,
            points: draft.points,
            date: today(),
            status: draft.status.unwrap_or_else(|| Self::REDEEMED.to_string()),
        }
    }
}
