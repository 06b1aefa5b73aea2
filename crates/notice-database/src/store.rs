//! Store traits the service layer depends on.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory implementation in [`crate::memory`].

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notice_core::result::AppResult;
use notice_core::types::ObjectRef;
use notice_core::types::id::{BatchId, NoticeId, NoticeTypeId, UserId};
use notice_entity::batch::{EnqueueBatch, QueuedBatch};
use notice_entity::notice::{CreateNotice, Notice};
use notice_entity::notice_type::{CreateNoticeType, NoticeType};
use notice_entity::observation::Observation;
use notice_entity::setting::NoticeSetting;
use notice_entity::user::{UpsertUser, User};

/// Users mirrored from the host application.
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Insert or refresh a user.
    async fn upsert(&self, data: UpsertUser) -> AppResult<User>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find every user among `ids`. Unknown ids are skipped.
    async fn find_many(&self, ids: &[UserId]) -> AppResult<Vec<User>>;

    /// All active users.
    async fn list_active(&self) -> AppResult<Vec<User>>;
}

/// Registered notice types.
#[async_trait]
pub trait NoticeTypeStore: Send + Sync + Debug {
    /// Find a type by its label.
    async fn find_by_label(&self, label: &str) -> AppResult<Option<NoticeType>>;

    /// All types sorted by label.
    async fn list(&self) -> AppResult<Vec<NoticeType>>;

    /// Insert a new type. Fails with `Conflict` when the label is taken.
    async fn insert(&self, data: &CreateNoticeType) -> AppResult<NoticeType>;

    /// Overwrite display, description and default sensitivity.
    async fn update(&self, id: NoticeTypeId, data: &CreateNoticeType) -> AppResult<NoticeType>;
}

/// Per-user, per-type, per-medium settings.
#[async_trait]
pub trait SettingStore: Send + Sync + Debug {
    /// Return the stored setting, creating it with `default_send` if absent.
    async fn get_or_create(
        &self,
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        medium: &str,
        default_send: bool,
    ) -> AppResult<NoticeSetting>;

    /// Store `send` for a setting, creating it if needed.
    async fn set_send(
        &self,
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        medium: &str,
        send: bool,
    ) -> AppResult<NoticeSetting>;

    /// All stored settings of a user.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<NoticeSetting>>;

    /// Turn a medium off for every notice type, materializing missing
    /// settings. Returns the number of rows written.
    async fn disable_medium(&self, user_id: UserId, medium: &str) -> AppResult<u64>;
}

/// Website inbox notices.
#[async_trait]
pub trait NoticeStore: Send + Sync + Debug {
    /// Store a new notice.
    async fn insert(&self, data: CreateNotice) -> AppResult<Notice>;

    /// Find a notice by id.
    async fn find_by_id(&self, id: NoticeId) -> AppResult<Option<Notice>>;

    /// Notices of a user, newest first.
    async fn list_for_user(&self, user_id: UserId, include_archived: bool)
    -> AppResult<Vec<Notice>>;

    /// Mark one notice seen.
    async fn mark_seen(&self, id: NoticeId) -> AppResult<()>;

    /// Mark every unseen notice of a user seen. Returns how many changed.
    async fn mark_all_seen(&self, user_id: UserId) -> AppResult<u64>;

    /// Archive one notice.
    async fn archive(&self, id: NoticeId) -> AppResult<()>;

    /// Delete one notice. Returns whether it existed.
    async fn delete(&self, id: NoticeId) -> AppResult<bool>;

    /// Number of unseen, non-archived notices of a user.
    async fn count_unseen(&self, user_id: UserId) -> AppResult<u64>;

    /// Delete archived notices added before `cutoff`.
    async fn delete_archived_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Keep only the newest `max_per_user` notices of every user.
    async fn trim_per_user(&self, max_per_user: u64) -> AppResult<u64>;
}

/// Observation relationships between users and host objects.
#[async_trait]
pub trait ObservationStore: Send + Sync + Debug {
    /// Insert unless the same user/type/object observation exists.
    /// Returns whether a row was created.
    async fn insert_if_absent(&self, observation: Observation) -> AppResult<bool>;

    /// The observation of `observed` by `user_id` for a type label.
    async fn find(
        &self,
        user_id: UserId,
        label: &str,
        observed: &ObjectRef,
    ) -> AppResult<Option<Observation>>;

    /// Delete the observation of `observed` by `user_id` for a type label.
    async fn delete(&self, user_id: UserId, label: &str, observed: &ObjectRef) -> AppResult<bool>;

    /// Every observation of `observed` for a type label, newest first.
    async fn observers(&self, observed: &ObjectRef, label: &str) -> AppResult<Vec<Observation>>;

    /// Observations of a user on objects of `content_type` for any of `labels`.
    async fn list_for_user(
        &self,
        user_id: UserId,
        content_type: &str,
        labels: &[String],
    ) -> AppResult<Vec<Observation>>;

    /// Delete every observation of an object.
    async fn delete_for_object(&self, observed: &ObjectRef) -> AppResult<u64>;
}

/// Counts of batches per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Waiting for a worker.
    pub pending: u64,
    /// Claimed by a worker.
    pub running: u64,
    /// Finished.
    pub completed: u64,
    /// Gave up.
    pub failed: u64,
}

/// Persistent batch queue consumed by the worker.
#[async_trait]
pub trait QueueStore: Send + Sync + Debug {
    /// Add a pending batch.
    async fn enqueue(&self, data: EnqueueBatch) -> AppResult<QueuedBatch>;

    /// Claim the oldest pending batch, moving it to running and counting
    /// the attempt.
    async fn claim_next(&self) -> AppResult<Option<QueuedBatch>>;

    /// Mark a batch completed.
    async fn complete(&self, id: BatchId) -> AppResult<()>;

    /// Record a failure; with `retry` the batch goes back to pending.
    async fn fail(&self, id: BatchId, error: &str, retry: bool) -> AppResult<()>;

    /// Find a batch by id.
    async fn find_by_id(&self, id: BatchId) -> AppResult<Option<QueuedBatch>>;

    /// Batch counts by status.
    async fn stats(&self) -> AppResult<QueueStats>;
}
