//! Runs queued emit requests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use notice_core::error::{AppError, ErrorKind};
use notice_entity::batch::QueuedBatch;
use notice_service::dispatch::EMIT_NOTICES_JOB;
use notice_service::notification::{EmitRequest, NotificationService};

use crate::executor::{JobExecutionError, JobHandler};

/// Sends the notices of one queued emit request
#[derive(Debug)]
pub struct EmitNoticesJobHandler {
    /// Notification service
    notification: Arc<NotificationService>,
}

impl EmitNoticesJobHandler {
    /// Create a new emit handler
    pub fn new(notification: Arc<NotificationService>) -> Self {
        Self { notification }
    }
}

#[async_trait]
impl JobHandler for EmitNoticesJobHandler {
    fn job_type(&self) -> &str {
        EMIT_NOTICES_JOB
    }

    async fn execute(&self, batch: &QueuedBatch) -> Result<Option<Value>, JobExecutionError> {
        let request: EmitRequest = serde_json::from_value(batch.payload.clone())
            .map_err(|e| JobExecutionError::Permanent(format!("Invalid emit payload: {e}")))?;

        let report = self.notification.emit(request).await.map_err(classify)?;

        tracing::info!(
            batch_id = %batch.id,
            notice_type = %report.notice_type,
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Queued notices sent"
        );

        Ok(Some(serde_json::to_value(&report).map_err(AppError::from)?))
    }
}

/// Errors that would repeat on every attempt are not retried.
fn classify(e: AppError) -> JobExecutionError {
    match e.kind {
        ErrorKind::NotFound
        | ErrorKind::Validation
        | ErrorKind::Template
        | ErrorKind::Configuration => JobExecutionError::Permanent(e.to_string()),
        _ => JobExecutionError::Transient(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice_backend::transport::OutboxTransport;
    use notice_backend::{BackendRegistry, TemplateRenderer};
    use notice_core::config::{AuthConfig, EmailConfig, NotificationConfig, WorkerConfig};
    use notice_core::types::id::UserId;
    use notice_database::memory::MemoryStore;
    use notice_database::store::{NoticeStore, QueueStore, UserStore};
    use notice_entity::batch::BatchStatus;
    use notice_entity::notice_type::CreateNoticeType;
    use notice_entity::user::UpsertUser;
    use notice_service::{
        BroadcastRequest, NoticeTypeService, SettingsService, UnsubscribeSigner,
    };
    use serde_json::Map;

    use crate::executor::JobExecutor;
    use crate::queue::JobQueue;
    use crate::runner::WorkerRunner;

    fn notification(store: &MemoryStore, renderer: TemplateRenderer) -> Arc<NotificationService> {
        let config = NotificationConfig::default();
        let registry = BackendRegistry::from_config(
            &config,
            &EmailConfig::default(),
            Arc::new(renderer),
            Arc::new(store.clone()),
            Arc::new(OutboxTransport::new()),
        )
        .unwrap();
        let notice_types = Arc::new(NoticeTypeService::new(Arc::new(store.clone())));
        let settings = Arc::new(SettingsService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            registry.media(),
        ));
        Arc::new(NotificationService::new(
            Arc::new(store.clone()),
            notice_types,
            settings,
            registry,
            Arc::new(UnsubscribeSigner::new(&AuthConfig::default())),
            config,
        ))
    }

    async fn user(store: &MemoryStore, username: &str, email: Option<&str>) -> UserId {
        UserStore::upsert(
            store,
            UpsertUser {
                id: UserId::new(),
                username: username.into(),
                email: email.map(str::to_string),
                language: None,
                is_active: true,
                is_superuser: false,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[test]
    fn test_deterministic_errors_are_permanent() {
        for err in [
            AppError::template("bad template"),
            AppError::configuration("no such medium"),
            AppError::not_found("no such type"),
            AppError::validation("bad label"),
        ] {
            assert!(matches!(classify(err), JobExecutionError::Permanent(_)));
        }
        assert!(matches!(
            classify(AppError::database("connection reset")),
            JobExecutionError::Transient(_)
        ));
    }

    #[tokio::test]
    async fn test_failing_template_does_not_duplicate_notices() {
        let store = MemoryStore::new();
        let mut renderer = TemplateRenderer::new().unwrap();
        renderer
            .register(
                "maintenance/notice",
                "{{#if recipient.email}}{{no_such_helper recipient.email}}{{/if}}down tonight",
            )
            .unwrap();
        let notification = notification(&store, renderer);
        NoticeTypeService::new(Arc::new(store.clone()))
            .create_notice_type(CreateNoticeType {
                label: "maintenance".into(),
                display: "Maintenance".into(),
                description: "Planned downtime".into(),
                default_sensitivity: 1,
            })
            .await
            .unwrap();
        let ana = user(&store, "ana", None).await;
        let bo = user(&store, "bo", Some("bo@example.com")).await;

        let queue = Arc::new(JobQueue::new(Arc::new(store.clone()), 3));
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(EmitNoticesJobHandler::new(notification)));
        let runner = WorkerRunner::new(
            Arc::clone(&queue),
            Arc::new(executor),
            WorkerConfig::default(),
            "test-worker".into(),
        );
        let payload = serde_json::to_value(EmitRequest::Broadcast(BroadcastRequest {
            label: "maintenance".into(),
            extra_context: Map::new(),
            sender: None,
            exclude: vec![],
        }))
        .unwrap();
        let batch = queue.enqueue(EMIT_NOTICES_JOB, payload).await.unwrap();

        assert_eq!(runner.drain().await.unwrap(), 1);
        let stored = QueueStore::find_by_id(&store, batch.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BatchStatus::Completed);
        assert_eq!(stored.attempts, 1);

        let notices = NoticeStore::list_for_user(&store, ana, true).await.unwrap();
        assert_eq!(notices.len(), 1);
        assert!(
            NoticeStore::list_for_user(&store, bo, true)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
