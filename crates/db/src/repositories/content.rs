//! Content store repository for moderation mutations.
//!
//! Items and messages are owned by their own domains; moderation only
//! reads previews and flips the `removed` flag. Removal is a
//! compare-and-set so re-applying it is a no-op, never an error.

use std::sync::Arc;

use crate::entities::{Item, Message, item, message};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tradepost_common::{AppError, AppResult};

/// Repository over the collaborator-owned item and message tables.
#[derive(Clone)]
pub struct ContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentRepository {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an item by ID.
    pub async fn find_item(&self, id: &str) -> AppResult<Option<item::Model>> {
        Item::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a message by ID.
    pub async fn find_message(&self, id: &str) -> AppResult<Option<message::Model>> {
        Message::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark an item as removed. Returns false when the item was already
    /// removed (or does not exist).
    pub async fn mark_item_removed(&self, id: &str) -> AppResult<bool> {
        let result = Item::update_many()
            .col_expr(item::Column::Removed, Expr::value(true))
            .filter(item::Column::Id.eq(id))
            .filter(item::Column::Removed.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Mark a message as removed. Returns false when the message was
    /// already removed (or does not exist).
    pub async fn mark_message_removed(&self, id: &str) -> AppResult<bool> {
        let result = Message::update_many()
            .col_expr(message::Column::Removed, Expr::value(true))
            .filter(message::Column::Id.eq(id))
            .filter(message::Column::Removed.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_mark_item_removed_idempotent() {
        // First call removes, second finds nothing left to update.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        assert!(repo.mark_item_removed("item1").await.unwrap());
        assert!(!repo.mark_item_removed("item1").await.unwrap());
    }
}
