//! Training modules and completion bonuses.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Points granted the first time a module reaches 100%.
pub const COMPLETION_BONUS: u32 = 100;

/// Modules every new user starts with.
pub const STARTER_MODULES: [&str; 4] = [
    "Waste Sorting Basics",
    "Recycling Guidelines",
    "Composting 101",
    "Community Impact",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingModule {
    pub name: String,
    /// 0..=100
    pub progress: u8,
    pub completed: bool,
    /// Set once the completion bonus has been paid out.
    #[serde(default)]
    pub bonus_awarded: bool,
}

impl TrainingModule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            progress: 0,
            completed: false,
            bonus_awarded: false,
        }
    }

    pub fn starter_set() -> Vec<Self> {
        STARTER_MODULES.iter().map(|n| Self::new(n)).collect()
    }

    /// Record progress (clamped to 100).
    ///
    /// Returns the bonus owed: `COMPLETION_BONUS` the first time the module is
    /// completed, zero otherwise.
    pub fn record_progress(&mut self, progress: u32) -> u32 {
        self.progress = progress.min(100) as u8;
        self.completed = self.progress >= 100;

        if self.completed && !self.bonus_awarded {
            self.bonus_awarded = true;
            COMPLETION_BONUS
        } else {
            0
        }
    }
}

/// Progress change request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgress {
    pub module_name: String,
    pub progress: u32,
}

/// Outcome of a progress update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingUpdate {
    pub training: Vec<TrainingModule>,
    /// Points granted by this update (zero when nothing was completed)
    #[serde(default)]
    pub bonus_points: u32,
    pub total_points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_set() {
        let modules = TrainingModule::starter_set();
        assert_eq!(modules.len(), 4);
        assert!(modules.iter().all(|m| m.progress == 0 && !m.completed));
        assert_eq!(modules[0].name, "Waste Sorting Basics");
    }

    #[test]
    fn test_bonus_paid_once() {
        let mut module = TrainingModule::new("Composting 101");
        assert_eq!(module.record_progress(40), 0);
        assert_eq!(module.record_progress(100), COMPLETION_BONUS);
        assert!(module.completed);
        assert_eq!(module.record_progress(100), 0);

        // Falling back and completing again does not pay twice
        assert_eq!(module.record_progress(60), 0);
        assert!(!module.completed);
        assert_eq!(module.record_progress(100), 0);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut module = TrainingModule::new("Community Impact");
        assert_eq!(module.record_progress(250), COMPLETION_BONUS);
        assert_eq!(module.progress, 100);
    }
}
