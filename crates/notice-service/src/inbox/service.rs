//! Inbox operations on website notices.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::info;

use notice_core::error::AppError;
use notice_core::result::AppResult;
use notice_core::types::id::NoticeId;
use notice_database::store::NoticeStore;
use notice_entity::notice::Notice;

use crate::context::RequestContext;

/// Notices newer than this count as latest even when seen.
const LATEST_WINDOW_DAYS: i64 = 3;
/// Minimum length of the latest list before falling back to the newest.
const LATEST_MIN: usize = 10;

/// A page of the notices view.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeList {
    /// Notices, newest first.
    pub notices: Vec<Notice>,
    /// Whether every notice was requested.
    pub all: bool,
    /// Current month, e.g. `"October 2026"`.
    pub this_month: String,
}

/// Reads and manages a user's website notices.
#[derive(Debug, Clone)]
pub struct InboxService {
    notices: Arc<dyn NoticeStore>,
    content_type_translations: HashMap<String, String>,
}

impl InboxService {
    /// Creates a new inbox service.
    pub fn new(
        notices: Arc<dyn NoticeStore>,
        content_type_translations: HashMap<String, String>,
    ) -> Self {
        Self {
            notices,
            content_type_translations,
        }
    }

    /// The user's non-archived notices. Unless `all` is set, only unseen or
    /// recent notices are kept, padded back to the newest ten when that
    /// leaves fewer than ten.
    pub async fn notices(&self, ctx: &RequestContext, all: bool) -> AppResult<NoticeList> {
        let notices = self.notices.list_for_user(ctx.user_id, false).await?;
        let this_month = ctx.request_time.format("%B %Y").to_string();
        if all {
            return Ok(NoticeList {
                notices,
                all,
                this_month,
            });
        }

        let old = ctx.request_time - Duration::days(LATEST_WINDOW_DAYS);
        let latest: Vec<Notice> = notices
            .iter()
            .filter(|n| n.unseen || n.added > old)
            .cloned()
            .collect();
        let notices = if latest.len() < LATEST_MIN {
            notices.into_iter().take(LATEST_MIN).collect()
        } else {
            latest
        };
        Ok(NoticeList {
            notices,
            all,
            this_month,
        })
    }

    /// One notice of the user, marked seen when `mark_seen` is set.
    pub async fn single(
        &self,
        ctx: &RequestContext,
        id: NoticeId,
        mark_seen: bool,
    ) -> AppResult<Notice> {
        let mut notice = self.owned(ctx, id).await?;
        if mark_seen && notice.unseen {
            self.notices.mark_seen(id).await?;
            notice.unseen = false;
        }
        Ok(notice)
    }

    /// Mark a notice seen and return the path to redirect to: `sender_url`
    /// when it is a local absolute path, else the stored sender path, else
    /// the sender's default path.
    pub async fn view_sender(
        &self,
        ctx: &RequestContext,
        id: NoticeId,
        sender_url: Option<&str>,
    ) -> AppResult<String> {
        let notice = self.single(ctx, id, true).await?;
        if let Some(url) = sender_url.filter(|u| is_local_path(u)) {
            return Ok(url.to_string());
        }
        if let Some(path) = notice.sender_path.as_deref().filter(|p| !p.is_empty()) {
            return Ok(path.to_string());
        }
        notice
            .sender()
            .map(|s| s.default_path(&self.content_type_translations))
            .ok_or_else(|| AppError::not_found(format!("Notice {id} has no sender")))
    }

    /// Archive a notice. Only the recipient or a superuser may; otherwise
    /// nothing happens. Returns whether the notice was archived.
    pub async fn archive(&self, ctx: &RequestContext, id: NoticeId) -> AppResult<bool> {
        match self.notices.find_by_id(id).await? {
            Some(notice) if ctx.can_manage(notice.recipient_id) => {
                self.notices.archive(id).await?;
                info!(notice_id = %id, user_id = %ctx.user_id, "Notice archived");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Delete a notice, with the same permission rule as [`Self::archive`].
    pub async fn delete(&self, ctx: &RequestContext, id: NoticeId) -> AppResult<bool> {
        match self.notices.find_by_id(id).await? {
            Some(notice) if ctx.can_manage(notice.recipient_id) => {
                let deleted = self.notices.delete(id).await?;
                info!(notice_id = %id, user_id = %ctx.user_id, "Notice deleted");
                Ok(deleted)
            }
            _ => Ok(false),
        }
    }

    /// Mark every unseen notice of the user seen.
    pub async fn mark_all_seen(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notices.mark_all_seen(ctx.user_id).await
    }

    /// Number of unseen notices.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notices.count_unseen(ctx.user_id).await
    }

    async fn owned(&self, ctx: &RequestContext, id: NoticeId) -> AppResult<Notice> {
        self.notices
            .find_by_id(id)
            .await?
            .filter(|n| n.recipient_id == ctx.user_id)
            .ok_or_else(|| AppError::not_found(format!("Notice {id} not found")))
    }
}

/// A path on this site: starts with one `/` and carries no scheme.
pub fn is_local_path(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.contains("://") && !url.contains('\\')
}
