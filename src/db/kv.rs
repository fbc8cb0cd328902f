// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value persistence used by the HTTP service.
//!
//! Layout (see [`crate::db::keys`]):
//! - `phone:<phone>` -> user id
//! - `user:<id>:profile` -> profile metadata (points and level live here)
//! - `user:<id>:bags|reports|rewards|training` -> one JSON list per kind

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::db::{append_to_list, keys, update_in_list, SubResource, UserDirectory};
use crate::error::{AppError, Result};
use crate::models::{
    BagEntry, NewBag, NewRedemption, NewReport, ProfileUpdate, RedemptionEntry, Registration,
    ReportEntry, TrainingModule, TrainingUpdate, UserProfile, UserRecord,
};

/// JSON values under string keys.
#[derive(Debug, Default)]
pub struct KvStore {
    entries: DashMap<String, Value>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.entries.get(key).map(|v| v.value().clone()) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| AppError::Storage(format!("Corrupt value at '{}': {}", key, e)))
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.entries
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Store `value` only if `key` is unset. Returns whether it was stored.
    pub fn insert_if_absent<T: Serialize>(&self, key: &str, value: &T) -> Result<bool> {
        let value = serde_json::to_value(value)?;
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
        }
    }

    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// `UserDirectory` over a [`KvStore`].
#[derive(Debug, Default)]
pub struct KvDirectory {
    kv: KvStore,
}

impl KvDirectory {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Full record for a user id (token resolution).
    pub fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let Some(profile) = self.find_profile(user_id)? else {
            return Ok(None);
        };
        self.assemble(profile).map(Some)
    }

    /// One sub-resource list; a missing list reads as empty.
    pub fn list<E: SubResource>(&self, user_id: &str) -> Result<Vec<E>> {
        Ok(self
            .kv
            .get::<Vec<E>>(&keys::user(user_id, E::KIND))?
            .unwrap_or_default())
    }

    fn store_list<E: SubResource>(&self, user_id: &str, list: &[E]) -> Result<()> {
        self.kv.set(&keys::user(user_id, E::KIND), &list)
    }

    fn user_id_for(&self, phone: &str) -> Result<String> {
        self.kv
            .get::<String>(&keys::phone(phone))?
            .ok_or_else(|| AppError::not_found_phone(phone))
    }

    /// Profile metadata only, without the sub-resource lists.
    pub fn find_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.kv.get(&keys::user(user_id, keys::PROFILE))
    }

    fn load_profile(&self, user_id: &str) -> Result<UserProfile> {
        self.find_profile(user_id)?
            .ok_or_else(|| AppError::Storage(format!("Profile missing for {}", user_id)))
    }

    fn store_profile(&self, profile: &UserProfile) -> Result<()> {
        self.kv
            .set(&keys::user(&profile.id, keys::PROFILE), profile)
    }

    fn assemble(&self, profile: UserProfile) -> Result<UserRecord> {
        let id = profile.id.clone();
        Ok(UserRecord {
            profile,
            bags: self.list(&id)?,
            reports: self.list(&id)?,
            rewards: self.list(&id)?,
            training: self.list(&id)?,
        })
    }

    fn append<E: SubResource>(&self, phone: &str, entry: E) -> Result<E> {
        let user_id = self.user_id_for(phone)?;
        let mut list = self.list::<E>(&user_id)?;
        let entry = append_to_list(&mut list, entry);
        self.store_list(&user_id, &list)?;
        tracing::debug!(user_id = %user_id, kind = E::KIND, count = list.len(), "Appended entry");
        Ok(entry)
    }
}

impl UserDirectory for KvDirectory {
    async fn register(&self, registration: Registration) -> Result<UserRecord> {
        registration.check()?;

        let record = UserRecord::new(registration);
        let id = record.id().to_string();

        if !self
            .kv
            .insert_if_absent(&keys::phone(record.phone()), &id)?
        {
            tracing::warn!("Registration rejected: phone already registered");
            return Err(AppError::DuplicatePhone);
        }

        self.store_profile(&record.profile)?;
        self.store_list::<BagEntry>(&id, &record.bags)?;
        self.store_list::<ReportEntry>(&id, &record.reports)?;
        self.store_list::<RedemptionEntry>(&id, &record.rewards)?;
        self.store_list::<TrainingModule>(&id, &record.training)?;

        tracing::info!(user_id = %id, "User registered");
        Ok(record)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>> {
        let Some(user_id) = self.kv.get::<String>(&keys::phone(phone))? else {
            return Ok(None);
        };
        let mut profile = self.load_profile(&user_id)?;
        profile.touch_login();
        self.store_profile(&profile)?;
        self.assemble(profile).map(Some)
    }

    async fn update(&self, phone: &str, update: ProfileUpdate) -> Result<UserRecord> {
        let user_id = self.user_id_for(phone)?;
        let mut profile = self.load_profile(&user_id)?;
        profile.apply(update);
        self.store_profile(&profile)?;
        tracing::info!(user_id = %user_id, "Profile updated");
        self.assemble(profile)
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
        let user_id = self.user_id_for(phone)?;
        let mut training = self.list::<TrainingModule>(&user_id)?;

        let bonus = update_in_list(&mut training, module_name, |m| m.record_progress(progress))
            .ok_or_else(|| AppError::NotFound(format!("Training module '{}'", module_name)))?;
        self.store_list(&user_id, &training)?;

        let mut profile = self.load_profile(&user_id)?;
        if bonus > 0 {
            profile.credit(bonus);
            self.store_profile(&profile)?;
            tracing::info!(
                user_id = %user_id,
                module = module_name,
                bonus,
                level = %profile.level,
                "Training module completed"
            );
        }

        Ok(TrainingUpdate {
            training,
            bonus_points: bonus,
            total_points: profile.total_points,
        })
    }

    async fn redeem(&self, phone: &str, reward_id: u32, points: u32) -> Result<RedemptionEntry> {
        let user_id = self.user_id_for(phone)?;
        let mut profile = self.load_profile(&user_id)?;
        profile.debit(points)?;
        self.store_profile(&profile)?;

        let entry = self.append(
            phone,
            RedemptionEntry::from_draft(NewRedemption {
                reward_id,
                points,
                status: None,
            }),
        )?;
        tracing::info!(user_id = %user_id, reward_id, points, "Reward redeemed");
        Ok(entry)
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>> {
        let suffix = format!(":{}", keys::PROFILE);
        let mut users = self
            .kv
            .keys_with_prefix(keys::USER_PREFIX)
            .into_iter()
            .filter(|k| k.ends_with(&suffix))
            .map(|k| self.load_profile(&k[keys::USER_PREFIX.len()..k.len() - suffix.len()]))
            .map(|profile| profile.and_then(|p| self.assemble(p)))
            .collect::<Result<Vec<_>>>()?;

        users.sort_by(|a, b| {
            a.profile
                .join_date
                .cmp(&b.profile.join_date)
                .then_with(|| a.profile.phone.cmp(&b.profile.phone))
        });
        Ok(users)
    }

    async fn clear(&self) -> Result<()> {
        let count = self.kv.len();
        self.kv.clear();
        tracing::info!(keys = count, "KV store cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;

    fn registration(phone: &str) -> Registration {
        Registration {
            phone: phone.to_string(),
            full_name: "Ana".to_string(),
            address: "12 Green St".to_string(),
            household_size: "3".to_string(),
            community: "Riverside".to_string(),
        }
    }

    #[test]
    fn test_insert_if_absent() {
        let kv = KvStore::new();
        assert!(kv.insert_if_absent("k", &1).unwrap());
        assert!(!kv.insert_if_absent("k", &2).unwrap());
        assert_eq!(kv.get::<i32>("k").unwrap(), Some(1));
        assert!(kv.delete("k"));
        assert!(kv.insert_if_absent("k", &3).unwrap());
    }

    #[test]
    fn test_corrupt_value_is_storage_error() {
        let kv = KvStore::new();
        kv.set("user:x:bags", &"not a list").unwrap();
        let err = kv.get::<Vec<BagEntry>>("user:x:bags").unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_register_writes_layout() {
        let dir = KvDirectory::default();
        let user = dir.register(registration("5551234567")).await.unwrap();

        let kv = dir.kv();
        assert_eq!(
            kv.get::<String>("phone:5551234567").unwrap(),
            Some(user.profile.id.clone())
        );
        let training: Vec<TrainingModule> = kv
            .get(&keys::user(&user.profile.id, "training"))
            .unwrap()
            .unwrap();
        assert_eq!(training.len(), 4);
        // phone index + profile + four lists
        assert_eq!(kv.len(), 6);
    }

    #[tokio::test]
    async fn test_duplicate_phone_leaves_one_user() {
        let dir = KvDirectory::default();
        dir.register(registration("5551234567")).await.unwrap();
        let err = dir.register(registration("5551234567")).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicatePhone));
        assert_eq!(dir.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_training_and_redeem_round_through_profile() {
        let dir = KvDirectory::default();
        let user = dir.register(registration("5551234567")).await.unwrap();

        let first = dir
            .set_training_progress("5551234567", "Recycling Guidelines", 100)
            .await
            .unwrap();
        let again = dir
            .set_training_progress("5551234567", "Recycling Guidelines", 100)
            .await
            .unwrap();
        assert_eq!(first.bonus_points, 100);
        assert_eq!(again.bonus_points, 0);
        assert_eq!(again.total_points, 100);

        let err = dir.redeem("5551234567", 1, 150).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientPoints { .. }));

        dir.redeem("5551234567", 9, 60).await.unwrap();
        let record = dir.find_by_id(&user.profile.id).unwrap().unwrap();
        assert_eq!(record.profile.total_points, 40);
        assert_eq!(record.profile.level, Level::Bronze);
        assert_eq!(record.rewards.len(), 1);
    }

    #[tokio::test]
    async fn test_append_unknown_phone_creates_nothing() {
        let dir = KvDirectory::default();
        let err = dir
            .append_bag(
                "5550000000",
                NewBag {
                    kind: "General".to_string(),
                    weight: "1 kg".to_string(),
                    qr_code: "QR".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(dir.kv().is_empty());
    }

    #[tokio::test]
    async fn test_clear_empties_everything() {
        let dir = KvDirectory::default();
        dir.register(registration("5551111111")).await.unwrap();
        dir.register(registration("5552222222")).await.unwrap();

        dir.clear().await.unwrap();

        assert!(dir.list_all().await.unwrap().is_empty());
        assert!(dir.find_by_phone("5551111111").await.unwrap().is_none());
    }
}
