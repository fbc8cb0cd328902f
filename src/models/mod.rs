//! Data models for the application.

pub mod bag;
pub mod report;
pub mod reward;
pub mod stats;
pub mod training;
pub mod user;

pub use bag::{BagEntry, BagStatus, NewBag};
pub use report::{Coordinates, NewReport, ReportEntry, ReportKind, ReportStatus};
pub use reward::{NewRedemption, RedemptionEntry, RewardOffer};
pub use stats::ProfileStats;
pub use training::{TrainingModule, TrainingProgress, TrainingUpdate};
pub use user::{HouseholdDetails, Level, ProfileUpdate, Registration, UserProfile, UserRecord};
