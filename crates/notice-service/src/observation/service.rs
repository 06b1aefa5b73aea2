//! Observation management and observer notification.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use notice_core::result::AppResult;
use notice_core::types::ObjectRef;
use notice_core::types::id::UserId;
use notice_database::store::ObservationStore;
use notice_entity::observation::Observation;

use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::notice_type::NoticeTypeService;
use crate::notification::{EmitRequest, SendRequest};

/// Notify everyone observing an object.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationNotice {
    /// The observed object.
    pub observed: ObjectRef,
    /// Notice type label.
    pub label: String,
    /// Extra template context.
    #[serde(default)]
    pub extra_context: Map<String, Value>,
    /// Observers left out, usually the user who caused the event.
    #[serde(default)]
    pub exclude: Vec<UserId>,
    /// Sender; defaults to the observed object.
    #[serde(default)]
    pub sender: Option<ObjectRef>,
}

/// Manages observations.
#[derive(Debug, Clone)]
pub struct ObservationService {
    store: Arc<dyn ObservationStore>,
    notice_types: Arc<NoticeTypeService>,
    dispatcher: Arc<Dispatcher>,
}

impl ObservationService {
    /// Creates a new observation service.
    pub fn new(
        store: Arc<dyn ObservationStore>,
        notice_types: Arc<NoticeTypeService>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            store,
            notice_types,
            dispatcher,
        }
    }

    /// Observe an object for each label. Returns how many observations
    /// were created.
    pub async fn observe(
        &self,
        observed: &ObjectRef,
        observer: UserId,
        labels: &[String],
    ) -> AppResult<usize> {
        let mut created = 0;
        for label in labels {
            let notice_type = self.notice_types.get(label).await?;
            let observation = Observation::new(observer, notice_type.id, label.as_str(), observed);
            if self.store.insert_if_absent(observation).await? {
                created += 1;
            }
        }
        if created > 0 {
            info!(user_id = %observer, observed = %observed, created, "Observing object");
        }
        Ok(created)
    }

    /// Stop observing an object for each label. Missing observations are
    /// ignored. Returns how many were removed.
    pub async fn stop_observing(
        &self,
        observed: &ObjectRef,
        observer: UserId,
        labels: &[String],
    ) -> AppResult<usize> {
        let mut removed = 0;
        for label in labels {
            if self.store.delete(observer, label, observed).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Whether the observer watches the object for every label. Anonymous
    /// observers watch nothing.
    pub async fn is_observing(
        &self,
        observed: &ObjectRef,
        observer: Option<UserId>,
        labels: &[String],
    ) -> AppResult<bool> {
        let Some(observer) = observer else {
            return Ok(false);
        };
        for label in labels {
            if self.store.find(observer, label, observed).await?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Every observation of an object for a label.
    pub async fn observers(&self, observed: &ObjectRef, label: &str) -> AppResult<Vec<Observation>> {
        self.store.observers(observed, label).await
    }

    /// The observation of an object by one user for a label.
    pub async fn get_for(
        &self,
        observed: &ObjectRef,
        observer: UserId,
        label: &str,
    ) -> AppResult<Option<Observation>> {
        self.store.find(observer, label, observed).await
    }

    /// Distinct objects of `content_type` the observer watches for any of
    /// `labels`, most recently observed first.
    pub async fn get_observations(
        &self,
        observer: Option<UserId>,
        content_type: &str,
        labels: &[String],
    ) -> AppResult<Vec<ObjectRef>> {
        let Some(observer) = observer else {
            return Ok(Vec::new());
        };
        let mut seen = HashSet::new();
        Ok(self
            .store
            .list_for_user(observer, content_type, labels)
            .await?
            .into_iter()
            .map(|o| o.observed())
            .filter(|o| seen.insert(o.clone()))
            .collect())
    }

    /// Send a notice to every observer of an object.
    pub async fn send_observation_notices_for(
        &self,
        notice: ObservationNotice,
    ) -> AppResult<Vec<DispatchOutcome>> {
        let observations = self.store.observers(&notice.observed, &notice.label).await?;
        let mut outcomes = Vec::new();
        for observation in observations {
            if !observation.send || notice.exclude.contains(&observation.user_id) {
                continue;
            }
            let mut context = notice.extra_context.clone();
            context.insert("observed".into(), serde_json::to_value(&notice.observed)?);
            let sender = match &notice.sender {
                Some(sender) => sender.clone(),
                None => {
                    context.insert("alter_desc".into(), true.into());
                    notice.observed.clone()
                }
            };
            let outcome = self
                .dispatcher
                .dispatch(EmitRequest::Send(SendRequest {
                    users: vec![observation.user_id],
                    label: notice.label.clone(),
                    extra_context: context,
                    sender: Some(sender),
                }))
                .await?;
            outcomes.push(outcome);
        }
        info!(
            observed = %notice.observed,
            label = %notice.label,
            notified = outcomes.len(),
            "Observers notified"
        );
        Ok(outcomes)
    }

    /// Drop every observation of a deleted object.
    pub async fn forget_object(&self, observed: &ObjectRef) -> AppResult<u64> {
        let removed = self.store.delete_for_object(observed).await?;
        info!(observed = %observed, removed, "Forgot object");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice_core::config::DispatchMode;
    use notice_database::store::NoticeStore;

    use crate::testing::Fixture;

    fn service(f: &Fixture) -> ObservationService {
        let dispatcher = Dispatcher::new(
            DispatchMode::Immediate,
            Arc::clone(&f.notification),
            Arc::new(f.store.clone()),
            3,
        );
        ObservationService::new(
            Arc::new(f.store.clone()),
            Arc::clone(&f.notice_types),
            Arc::new(dispatcher),
        )
    }

    fn post(id: &str) -> ObjectRef {
        ObjectRef::new("post", id).unwrap()
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_is_observing_requires_every_label() {
        let f = Fixture::new();
        f.notice_type("reply", 2).await;
        f.notice_type("edit", 2).await;
        let ana = f.user("ana", None).await;
        let service = service(&f);

        assert_eq!(service.observe(&post("1"), ana.id, &labels(&["reply"])).await.unwrap(), 1);
        assert_eq!(service.observe(&post("1"), ana.id, &labels(&["reply"])).await.unwrap(), 0);

        assert!(service.is_observing(&post("1"), Some(ana.id), &labels(&["reply"])).await.unwrap());
        assert!(
            !service
                .is_observing(&post("1"), Some(ana.id), &labels(&["reply", "edit"]))
                .await
                .unwrap()
        );
        assert!(!service.is_observing(&post("1"), None, &labels(&["reply"])).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_observations_is_distinct() {
        let f = Fixture::new();
        f.notice_type("reply", 2).await;
        f.notice_type("edit", 2).await;
        let ana = f.user("ana", None).await;
        let service = service(&f);
        let both = labels(&["reply", "edit"]);

        service.observe(&post("1"), ana.id, &both).await.unwrap();
        service.observe(&post("2"), ana.id, &labels(&["edit"])).await.unwrap();

        let objects = service.get_observations(Some(ana.id), "post", &both).await.unwrap();
        assert_eq!(objects.len(), 2);
        assert!(service.get_observations(None, "post", &both).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notify_skips_excluded_and_defaults_sender() {
        let f = Fixture::new();
        f.notice_type("reply", 2).await;
        let ana = f.user("ana", None).await;
        let bo = f.user("bo", None).await;
        let service = service(&f);
        for user in [ana.id, bo.id] {
            service.observe(&post("9"), user, &labels(&["reply"])).await.unwrap();
        }

        let outcomes = service
            .send_observation_notices_for(ObservationNotice {
                observed: post("9"),
                label: "reply".into(),
                extra_context: Map::new(),
                exclude: vec![bo.id],
                sender: None,
            })
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 1);

        let notices = NoticeStore::list_for_user(&f.store, ana.id, false).await.unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].sender(), Some(post("9")));
        assert_eq!(notices[0].context["alter_desc"], Value::Bool(true));
        assert_eq!(notices[0].sender_path.as_deref(), Some("/post/9/"));
        assert_eq!(NoticeStore::count_unseen(&f.store, bo.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_forget_object_removes_observers() {
        let f = Fixture::new();
        f.notice_type("reply", 2).await;
        let ana = f.user("ana", None).await;
        let service = service(&f);
        service.observe(&post("3"), ana.id, &labels(&["reply"])).await.unwrap();

        assert_eq!(service.forget_object(&post("3")).await.unwrap(), 1);
        assert!(service.observers(&post("3"), "reply").await.unwrap().is_empty());
    }
}
