//! Content filter audit log repository.

use std::sync::Arc;

use crate::entities::{ContentFilterLog, content_filter_log};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tradepost_common::{AppError, AppResult};

/// Filter log repository. The log is append-only: there are no update or
/// delete operations.
#[derive(Clone)]
pub struct FilterLogRepository {
    db: Arc<DatabaseConnection>,
}

impl FilterLogRepository {
    /// Create a new filter log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a filter log entry.
    pub async fn create(
        &self,
        model: content_filter_log::ActiveModel,
    ) -> AppResult<content_filter_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List log entries for a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<content_filter_log::Model>> {
        ContentFilterLog::find()
            .filter(content_filter_log::Column::UserId.eq(user_id))
            .order_by_desc(content_filter_log::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count log entries for a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        ContentFilterLog::find()
            .filter(content_filter_log::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
