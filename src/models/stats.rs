//! Dashboard statistics derived from a user record.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{BagStatus, ReportStatus, UserRecord};

/// Counts shown on the profile tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileStats {
    pub total_bags: u32,
    pub collected_bags: u32,
    pub resolved_reports: u32,
    pub total_points: u32,
}

impl ProfileStats {
    pub fn from_record(record: &UserRecord) -> Self {
        let collected_bags = record
            .bags
            .iter()
            .filter(|b| b.status == BagStatus::Collected)
            .count();
        let resolved_reports = record
            .reports
            .iter()
            .filter(|r| r.status == ReportStatus::Resolved)
            .count();

        Self {
            total_bags: record.bags.len() as u32,
            collected_bags: collected_bags as u32,
            resolved_reports: resolved_reports as u32,
            total_points: record.profile.total_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BagEntry, NewBag, Registration};

    fn bag(status: BagStatus) -> BagEntry {
        let mut entry = BagEntry::from_draft(NewBag {
            kind: "Recyclables".to_string(),
            weight: "2 kg".to_string(),
            qr_code: "QR-1".to_string(),
        });
        entry.status = status;
        entry
    }

    #[test]
    fn test_counts_only_collected_bags() {
        let mut record = UserRecord::new(Registration {
            phone: "5550001000".to_string(),
            full_name: "Ana".to_string(),
            address: String::new(),
            household_size: String::new(),
            community: String::new(),
        });
        record.bags.push(bag(BagStatus::Collected));
        record.bags.push(bag(BagStatus::Pending));
        record.bags.push(bag(BagStatus::Rejected));
        record.profile.credit(40);

        let stats = ProfileStats::from_record(&record);

        assert_eq!(stats.total_bags, 3);
        assert_eq!(stats.collected_bags, 1);
        assert_eq!(stats.resolved_reports, 0);
        assert_eq!(stats.total_points, 40);
    }
}
