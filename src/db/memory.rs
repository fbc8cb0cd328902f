//! In-memory user store keyed by phone number.
//!
//! Each instance owns its own map, so tests get isolation by constructing a
//! fresh store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::db::{append_to_list, update_in_list, SubResource, UserDirectory};
use crate::error::{AppError, Result};
use crate::models::{
    BagEntry, NewBag, NewRedemption, NewReport, ProfileUpdate, RedemptionEntry, Registration,
    ReportEntry, TrainingUpdate, UserRecord,
};

/// Users keyed by phone number.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, UserRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Credit points for a verified bag or report.
    pub fn credit_points(&self, phone: &str, points: u32) -> Result<u32> {
        self.with_record(phone, |record| {
            record.profile.credit(points);
            tracing::info!(
                user_id = %record.profile.id,
                points,
                total = record.profile.total_points,
                "Points credited"
            );
            Ok(record.profile.total_points)
        })
    }

    /// Run `f` against the record for `phone` while holding its shard lock.
    fn with_record<R>(
        &self,
        phone: &str,
        f: impl FnOnce(&mut UserRecord) -> Result<R>,
    ) -> Result<R> {
        let mut record = self
            .users
            .get_mut(phone)
            .ok_or_else(|| AppError::not_found_phone(phone))?;
        f(record.value_mut())
    }

    fn append<E: SubResource>(&self, phone: &str, entry: E) -> Result<E> {
        self.with_record(phone, |record| {
            tracing::debug!(user_id = %record.profile.id, kind = E::KIND, "Appending entry");
            Ok(append_to_list(E::list_mut(record), entry))
        })
    }
}

impl UserDirectory for MemoryStore {
    async fn register(&self, registration: Registration) -> Result<UserRecord> {
        registration.check()?;

        match self.users.entry(registration.phone.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!("Registration rejected: phone already registered");
                Err(AppError::DuplicatePhone)
            }
            Entry::Vacant(slot) => {
                let record = UserRecord::new(registration);
                tracing::info!(user_id = %record.profile.id, "User registered");
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.get_mut(phone).map(|mut record| {
            record.profile.touch_login();
            record.value().clone()
        }))
    }

    async fn update(&self, phone: &str, update: ProfileUpdate) -> Result<UserRecord> {
        self.with_record(phone, |record| {
            record.profile.apply(update);
            Ok(record.clone())
        })
    }

    async fn append_bag(&self, phone: &str, bag: NewBag) -> Result<BagEntry> {
        self.append(phone, BagEntry::from_draft(bag))
    }

    async fn append_report(&self, phone: &str, report: NewReport) -> Result<ReportEntry> {
        self.append(phone, ReportEntry::from_draft(report))
    }

    async fn append_reward(&self, phone: &str, reward: NewRedemption) -> Result<RedemptionEntry> {
        self.append(phone, RedemptionEntry::from_draft(reward))
    }

    async fn set_training_progress(
        &self,
        phone: &str,
        module_name: &str,
        progress: u32,
    ) -> Result<TrainingUpdate> {
        self.with_record(phone, |record| {
            let bonus = update_in_list(&mut record.training, module_name, |m| {
                m.record_progress(progress)
            })
            .ok_or_else(|| AppError::NotFound(format!("Training module '{}'", module_name)))?;

            if bonus > 0 {
                record.profile.credit(bonus);
                tracing::info!(
                    user_id = %record.profile.id,
                    module = module_name,
                    bonus,
                    level = %record.profile.level,
                    "Training module completed"
                );
            }

            Ok(TrainingUpdate {
                training: record.training.clone(),
                bonus_points: bonus,
                total_points: record.profile.total_points,
            })
        })
    }

    async fn redeem(&self, phone: &str, reward_id: u32, points: u32) -> Result<RedemptionEntry> {
        self.with_record(phone, |record| {
            record.profile.debit(points)?;
            let entry = RedemptionEntry::from_draft(NewRedemption {
                reward_id,
                points,
                status: None,
            });
            tracing::info!(user_id = %record.profile.id, reward_id, points, "Reward redeemed");
            Ok(append_to_list(&mut record.rewards, entry))
        })
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.iter().map(|r| r.value().clone()).collect();
        users.sort_by(|a, b| {
            a.profile
                .join_date
                .cmp(&b.profile.join_date)
                .then_with(|| a.profile.phone.cmp(&b.profile.phone))
        });
        Ok(users)
    }

    async fn clear(&self) -> Result<()> {
        let count = self.users.len();
        self.users.clear();
        tracing::info!(count, "All users cleared");
        Ok(())
    }
}
