//! In-memory implementation of every store trait.
//!
//! All tables live behind one `tokio::sync::RwLock`, so each operation is
//! atomic with respect to the others.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use notice_core::error::AppError;
use notice_core::result::AppResult;
use notice_core::types::ObjectRef;
use notice_core::types::id::{BatchId, NoticeId, NoticeTypeId, UserId};
use notice_entity::batch::{BatchStatus, EnqueueBatch, QueuedBatch};
use notice_entity::notice::{CreateNotice, Notice};
use notice_entity::notice_type::{CreateNoticeType, NoticeType};
use notice_entity::observation::Observation;
use notice_entity::setting::NoticeSetting;
use notice_entity::user::{UpsertUser, User};

use crate::store::{
    NoticeStore, NoticeTypeStore, ObservationStore, QueueStats, QueueStore, SettingStore,
    UserStore,
};

type SettingKey = (UserId, NoticeTypeId, String);

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    notice_types: HashMap<NoticeTypeId, NoticeType>,
    settings: HashMap<SettingKey, NoticeSetting>,
    notices: Vec<Notice>,
    observations: Vec<Observation>,
    batches: Vec<QueuedBatch>,
}

/// Store keeping every table in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(notices: &mut [Notice]) {
    notices.sort_by(|a, b| b.added.cmp(&a.added));
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert(&self, data: UpsertUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let created_at = tables
            .users
            .get(&data.id)
            .map(|u| u.created_at)
            .unwrap_or_else(Utc::now);
        let user = data.into_user(created_at);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn list_active(&self) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().filter(|u| u.is_active).cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}

#[async_trait]
impl NoticeTypeStore for MemoryStore {
    async fn find_by_label(&self, label: &str) -> AppResult<Option<NoticeType>> {
        let tables = self.tables.read().await;
        Ok(tables.notice_types.values().find(|t| t.label == label).cloned())
    }

    async fn list(&self) -> AppResult<Vec<NoticeType>> {
        let tables = self.tables.read().await;
        let mut types: Vec<NoticeType> = tables.notice_types.values().cloned().collect();
        types.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(types)
    }

    async fn insert(&self, data: &CreateNoticeType) -> AppResult<NoticeType> {
        let mut tables = self.tables.write().await;
        if tables.notice_types.values().any(|t| t.label == data.label) {
            return Err(AppError::conflict(format!(
                "Notice type '{}' already exists",
                data.label
            )));
        }
        let now = Utc::now();
        let notice_type = NoticeType {
            id: NoticeTypeId::new(),
            label: data.label.clone(),
            display: data.display.clone(),
            description: data.description.clone(),
            default_sensitivity: data.default_sensitivity,
            created_at: now,
            updated_at: now,
        };
        tables.notice_types.insert(notice_type.id, notice_type.clone());
        Ok(notice_type)
    }

    async fn update(&self, id: NoticeTypeId, data: &CreateNoticeType) -> AppResult<NoticeType> {
        let mut tables = self.tables.write().await;
        let notice_type = tables
            .notice_types
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Notice type {id} not found")))?;
        notice_type.display = data.display.clone();
        notice_type.description = data.description.clone();
        notice_type.default_sensitivity = data.default_sensitivity;
        notice_type.updated_at = Utc::now();
        Ok(notice_type.clone())
    }
}

#[async_trait]
impl SettingStore for MemoryStore {
    async fn get_or_create(
        &self,
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        medium: &str,
        default_send: bool,
    ) -> AppResult<NoticeSetting> {
        let mut tables = self.tables.write().await;
        let setting = tables
            .settings
            .entry((user_id, notice_type_id, medium.to_string()))
            .or_insert_with(|| NoticeSetting {
                user_id,
                notice_type_id,
                medium: medium.to_string(),
                send: default_send,
            });
        Ok(setting.clone())
    }

    async fn set_send(
        &self,
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        medium: &str,
        send: bool,
    ) -> AppResult<NoticeSetting> {
        let setting = NoticeSetting {
            user_id,
            notice_type_id,
            medium: medium.to_string(),
            send,
        };
        self.tables.write().await.settings.insert(
            (user_id, notice_type_id, medium.to_string()),
            setting.clone(),
        );
        Ok(setting)
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<NoticeSetting>> {
        let tables = self.tables.read().await;
        Ok(tables
            .settings
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn disable_medium(&self, user_id: UserId, medium: &str) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let type_ids: Vec<NoticeTypeId> = tables.notice_types.keys().copied().collect();
        for notice_type_id in &type_ids {
            tables.settings.insert(
                (user_id, *notice_type_id, medium.to_string()),
                NoticeSetting {
                    user_id,
                    notice_type_id: *notice_type_id,
                    medium: medium.to_string(),
                    send: false,
                },
            );
        }
        Ok(type_ids.len() as u64)
    }
}

#[async_trait]
impl NoticeStore for MemoryStore {
    async fn insert(&self, data: CreateNotice) -> AppResult<Notice> {
        let notice = data.into_notice(NoticeId::new(), Utc::now());
        self.tables.write().await.notices.push(notice.clone());
        Ok(notice)
    }

    async fn find_by_id(&self, id: NoticeId) -> AppResult<Option<Notice>> {
        let tables = self.tables.read().await;
        Ok(tables.notices.iter().find(|n| n.id == id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        include_archived: bool,
    ) -> AppResult<Vec<Notice>> {
        let tables = self.tables.read().await;
        let mut notices: Vec<Notice> = tables
            .notices
            .iter()
            .filter(|n| n.recipient_id == user_id && (include_archived || !n.archived))
            .cloned()
            .collect();
        newest_first(&mut notices);
        Ok(notices)
    }

    async fn mark_seen(&self, id: NoticeId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(notice) = tables.notices.iter_mut().find(|n| n.id == id) {
            notice.unseen = false;
        }
        Ok(())
    }

    async fn mark_all_seen(&self, user_id: UserId) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for notice in tables
            .notices
            .iter_mut()
            .filter(|n| n.recipient_id == user_id && n.unseen && !n.archived)
        {
            notice.unseen = false;
            changed += 1;
        }
        Ok(changed)
    }

    async fn archive(&self, id: NoticeId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(notice) = tables.notices.iter_mut().find(|n| n.id == id) {
            notice.archived = true;
        }
        Ok(())
    }

    async fn delete(&self, id: NoticeId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.notices.len();
        tables.notices.retain(|n| n.id != id);
        Ok(tables.notices.len() < before)
    }

    async fn count_unseen(&self, user_id: UserId) -> AppResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .notices
            .iter()
            .filter(|n| n.recipient_id == user_id && n.unseen && !n.archived)
            .count() as u64)
    }

    async fn delete_archived_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.notices.len();
        tables.notices.retain(|n| !(n.archived && n.added < cutoff));
        Ok((before - tables.notices.len()) as u64)
    }

    async fn trim_per_user(&self, max_per_user: u64) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.notices.len();
        newest_first(&mut tables.notices);
        let mut kept: HashMap<UserId, u64> = HashMap::new();
        tables.notices.retain(|n| {
            let count = kept.entry(n.recipient_id).or_insert(0);
            *count += 1;
            *count <= max_per_user
        });
        Ok((before - tables.notices.len()) as u64)
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn insert_if_absent(&self, observation: Observation) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let exists = tables.observations.iter().any(|o| {
            o.user_id == observation.user_id
                && o.notice_type_id == observation.notice_type_id
                && o.content_type == observation.content_type
                && o.object_id == observation.object_id
        });
        if exists {
            return Ok(false);
        }
        tables.observations.push(observation);
        Ok(true)
    }

    async fn find(
        &self,
        user_id: UserId,
        label: &str,
        observed: &ObjectRef,
    ) -> AppResult<Option<Observation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .observations
            .iter()
            .find(|o| o.user_id == user_id && o.notice_type_label == label && o.is_for(observed))
            .cloned())
    }

    async fn delete(&self, user_id: UserId, label: &str, observed: &ObjectRef) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.observations.len();
        tables.observations.retain(|o| {
            !(o.user_id == user_id && o.notice_type_label == label && o.is_for(observed))
        });
        Ok(tables.observations.len() < before)
    }

    async fn observers(&self, observed: &ObjectRef, label: &str) -> AppResult<Vec<Observation>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Observation> = tables
            .observations
            .iter()
            .filter(|o| o.notice_type_label == label && o.is_for(observed))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.added.cmp(&a.added));
        Ok(found)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        content_type: &str,
        labels: &[String],
    ) -> AppResult<Vec<Observation>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Observation> = tables
            .observations
            .iter()
            .filter(|o| {
                o.user_id == user_id
                    && o.content_type == content_type
                    && labels.contains(&o.notice_type_label)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.added.cmp(&a.added));
        Ok(found)
    }

    async fn delete_for_object(&self, observed: &ObjectRef) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.observations.len();
        tables.observations.retain(|o| !o.is_for(observed));
        Ok((before - tables.observations.len()) as u64)
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn enqueue(&self, data: EnqueueBatch) -> AppResult<QueuedBatch> {
        let batch = data.into_batch(Utc::now());
        self.tables.write().await.batches.push(batch.clone());
        Ok(batch)
    }

    async fn claim_next(&self) -> AppResult<Option<QueuedBatch>> {
        let mut tables = self.tables.write().await;
        // Batches are appended in enqueue order, so the first pending one is
        // the oldest.
        let Some(batch) = tables
            .batches
            .iter_mut()
            .find(|b| b.status == BatchStatus::Pending)
        else {
            return Ok(None);
        };
        batch.status = BatchStatus::Running;
        batch.attempts += 1;
        batch.updated_at = Utc::now();
        Ok(Some(batch.clone()))
    }

    async fn complete(&self, id: BatchId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(batch) = tables.batches.iter_mut().find(|b| b.id == id) {
            batch.status = BatchStatus::Completed;
            batch.error_message = None;
            batch.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn fail(&self, id: BatchId, error: &str, retry: bool) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(batch) = tables.batches.iter_mut().find(|b| b.id == id) {
            batch.status = if retry {
                BatchStatus::Pending
            } else {
                BatchStatus::Failed
            };
            batch.error_message = Some(error.to_string());
            batch.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn find_by_id(&self, id: BatchId) -> AppResult<Option<QueuedBatch>> {
        let tables = self.tables.read().await;
        Ok(tables.batches.iter().find(|b| b.id == id).cloned())
    }

    async fn stats(&self) -> AppResult<QueueStats> {
        let tables = self.tables.read().await;
        let mut stats = QueueStats::default();
        for batch in &tables.batches {
            match batch.status {
                BatchStatus::Pending => stats.pending += 1,
                BatchStatus::Running => stats.running += 1,
                BatchStatus::Completed => stats.completed += 1,
                BatchStatus::Failed => stats.failed += 1,
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, active: bool) -> UpsertUser {
        UpsertUser {
            id: UserId::new(),
            username: name.into(),
            email: Some(format!("{name}@example.com")),
            language: None,
            is_active: active,
            is_superuser: false,
        }
    }

    fn create_type(label: &str) -> CreateNoticeType {
        CreateNoticeType {
            label: label.into(),
            display: label.into(),
            description: String::new(),
            default_sensitivity: 2,
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_created_at() {
        let store = MemoryStore::new();
        let data = user("ana", true);
        let first = store.upsert(data.clone()).await.unwrap();
        let mut changed = data;
        changed.username = "ana2".into();
        let second = store.upsert(changed).await.unwrap();
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.username, "ana2");
    }

    #[tokio::test]
    async fn test_list_active_skips_inactive() {
        let store = MemoryStore::new();
        store.upsert(user("ana", true)).await.unwrap();
        store.upsert(user("bob", false)).await.unwrap();
        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].username, "ana");
    }

    #[tokio::test]
    async fn test_duplicate_label_conflicts() {
        let store = MemoryStore::new();
        NoticeTypeStore::insert(&store, &create_type("comment")).await.unwrap();
        let err = NoticeTypeStore::insert(&store, &create_type("comment"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, notice_core::error::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_get_or_create_keeps_existing_value() {
        let store = MemoryStore::new();
        let uid = UserId::new();
        let tid = NoticeTypeId::new();
        let first = store.get_or_create(uid, tid, "1", true).await.unwrap();
        assert!(first.send);
        store.set_send(uid, tid, "1", false).await.unwrap();
        let again = store.get_or_create(uid, tid, "1", true).await.unwrap();
        assert!(!again.send);
    }

    #[tokio::test]
    async fn test_disable_medium_materializes_settings() {
        let store = MemoryStore::new();
        let uid = UserId::new();
        NoticeTypeStore::insert(&store, &create_type("a")).await.unwrap();
        NoticeTypeStore::insert(&store, &create_type("b")).await.unwrap();
        let written = store.disable_medium(uid, "2").await.unwrap();
        assert_eq!(written, 2);
        let settings = SettingStore::list_for_user(&store, uid).await.unwrap();
        assert!(settings.iter().all(|s| s.medium == "2" && !s.send));
    }

    #[tokio::test]
    async fn test_trim_per_user_keeps_newest() {
        let store = MemoryStore::new();
        let uid = UserId::new();
        let tid = NoticeTypeId::new();
        for i in 0..5 {
            NoticeStore::insert(
                &store,
                CreateNotice {
                    recipient_id: uid,
                    notice_type_id: tid,
                    notice_type_label: "comment".into(),
                    message: format!("n{i}"),
                    context: serde_json::json!({}),
                    sender: None,
                    sender_path: None,
                    on_site: true,
                },
            )
            .await
            .unwrap();
        }
        let removed = store.trim_per_user(3).await.unwrap();
        assert_eq!(removed, 2);
        let left = NoticeStore::list_for_user(&store, uid, true).await.unwrap();
        assert_eq!(left.len(), 3);
    }

    #[tokio::test]
    async fn test_claim_and_retry_cycle() {
        let store = MemoryStore::new();
        let batch = store
            .enqueue(EnqueueBatch {
                job_type: "emit_notices".into(),
                payload: serde_json::json!({}),
                max_attempts: 2,
            })
            .await
            .unwrap();

        let claimed = store.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, batch.id);
        assert_eq!(claimed.attempts, 1);
        assert!(store.claim_next().await.unwrap().is_none());

        store.fail(batch.id, "smtp down", true).await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.pending, 1);

        let claimed = store.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.attempts, 2);
        store.complete(batch.id).await.unwrap();
        let done = QueueStore::find_by_id(&store, batch.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, BatchStatus::Completed);
    }
}
