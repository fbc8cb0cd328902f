// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer: the `UserDirectory` capability set and its implementers.
//!
//! - [`MemoryStore`]: in-memory map keyed by phone number (tests, demos)
//! - [`KvDirectory`]: per-user JSON lists in a key-value store (HTTP service)
//! - [`crate::services::RemoteDirectory`]: the same operations over HTTP

pub mod kv;
pub mod memory;

pub use kv::{KvDirectory, KvStore};
pub use memory::MemoryStore;

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::models::{
    BagEntry, NewBag, NewRedemption, NewReport, ProfileUpdate, RedemptionEntry, Registration,
    ReportEntry, TrainingModule, TrainingUpdate, UserRecord,
};

/// Key layout for the KV store.
pub mod keys {
    /// Prefix shared by every per-user key.
    pub const USER_PREFIX: &str = "user:";
    /// Kind suffix of the profile metadata entry.
    pub const PROFILE: &str = "profile";

    /// `user:<id>:<kind>`
    pub fn user(user_id: &str, kind: &str) -> String {
        format!("{}{}:{}", USER_PREFIX, user_id, kind)
    }

    /// `phone:<phone>` -> user id
    pub fn phone(phone: &str) -> String {
        format!("phone:{}", phone)
    }
}

/// Operations every user store supports. UI code depends on this trait only,
/// never on which implementer is active.
pub trait UserDirectory: Send + Sync {
    /// Create a record. Fails with `DuplicatePhone` if the phone is taken.
    fn register(&self, registration: Registration)
        -> impl Future<Output = Result<UserRecord>> + Send;

    /// Look a user up by phone, refreshing `last_login` on a hit.
    fn find_by_phone(&self, phone: &str) -> impl Future<Output = Result<Option<UserRecord>>> + Send;

    /// Merge profile fields into an existing record.
    fn update(
        &self,
        phone: &str,
        update: ProfileUpdate,
    ) -> impl Future<Output = Result<UserRecord>> + Send;

    fn append_bag(&self, phone: &str, bag: NewBag) -> impl Future<Output = Result<BagEntry>> + Send;

    fn append_report(
        &self,
        phone: &str,
        report: NewReport,
    ) -> impl Future<Output = Result<ReportEntry>> + Send;

    fn append_reward(
        &self,
        phone: &str,
        reward: NewRedemption,
    ) -> impl Future<Output = Result<RedemptionEntry>> + Send;

    /// Set a module's progress; pays the completion bonus at most once.
    fn set_training_progress(
        &self,
        phone: &str,
        module_name: &str,
        progress: u32,
    ) -> impl Future<Output = Result<TrainingUpdate>> + Send;

    /// Spend points on a reward and log the redemption.
    fn redeem(
        &self,
        phone: &str,
        reward_id: u32,
        points: u32,
    ) -> impl Future<Output = Result<RedemptionEntry>> + Send;

    fn list_all(&self) -> impl Future<Output = Result<Vec<UserRecord>>> + Send;

    fn clear(&self) -> impl Future<Output = Result<()>> + Send;
}

/// A list nested inside a user record.
pub trait SubResource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Field name in the record and kind suffix in the KV layout.
    const KIND: &'static str;

    /// Value entries are matched on by `update_in_list`.
    fn match_key(&self) -> &str;

    fn list_mut(record: &mut UserRecord) -> &mut Vec<Self>;
}

impl SubResource for BagEntry {
    const KIND: &'static str = "bags";

    fn match_key(&self) -> &str {
        &self.id
    }

    fn list_mut(record: &mut UserRecord) -> &mut Vec<Self> {
        &mut record.bags
    }
}

impl SubResource for ReportEntry {
    const KIND: &'static str = "reports";

    fn match_key(&self) -> &str {
        &self.id
    }

    fn list_mut(record: &mut UserRecord) -> &mut Vec<Self> {
        &mut record.reports
    }
}

impl SubResource for RedemptionEntry {
    const KIND: &'static str = "rewards";

    fn match_key(&self) -> &str {
        &self.id
    }

    fn list_mut(record: &mut UserRecord) -> &mut Vec<Self> {
        &mut record.rewards
    }
}

impl SubResource for TrainingModule {
    const KIND: &'static str = "training";

    fn match_key(&self) -> &str {
        &self.name
    }

    fn list_mut(record: &mut UserRecord) -> &mut Vec<Self> {
        &mut record.training
    }
}

/// Push one entry and hand back a copy of it.
pub fn append_to_list<E: SubResource>(list: &mut Vec<E>, entry: E) -> E {
    list.push(entry.clone());
    entry
}

/// Patch the entry whose match key equals `key`. `None` if there is no such entry.
pub fn update_in_list<E: SubResource, R>(
    list: &mut [E],
    key: &str,
    patch: impl FnOnce(&mut E) -> R,
) -> Option<R> {
    list.iter_mut().find(|e| e.match_key() == key).map(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(keys::user("user-1", BagEntry::KIND), "user:user-1:bags");
        assert_eq!(keys::user("user-1", keys::PROFILE), "user:user-1:profile");
        assert_eq!(keys::phone("5551234567"), "phone:5551234567");
    }

    #[test]
    fn test_update_in_list_matches_by_key() {
        let mut modules = TrainingModule::starter_set();

        let bonus = update_in_list(&mut modules, "Composting 101", |m| m.record_progress(100));
        assert_eq!(bonus, Some(100));
        assert!(modules[2].completed);

        let missing = update_in_list(&mut modules, "Unknown", |m| m.record_progress(100));
        assert!(missing.is_none());
    }
}
