//! Blocked keyword repository.

use std::sync::Arc;

use crate::entities::{BlockedKeyword, blocked_keyword};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tradepost_common::{AppError, AppResult};

/// Blocked keyword repository for database operations.
#[derive(Clone)]
pub struct KeywordRepository {
    db: Arc<DatabaseConnection>,
}

impl KeywordRepository {
    /// Create a new keyword repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find all enabled keyword rules, in creation order.
    ///
    /// Rule iteration order matters: the audit log references the first
    /// rule that matched.
    pub async fn find_enabled(&self) -> AppResult<Vec<blocked_keyword::Model>> {
        BlockedKeyword::find()
            .filter(blocked_keyword::Column::Enabled.eq(true))
            .order_by_asc(blocked_keyword::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::blocked_keyword::{PatternType, Severity};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_keyword(id: &str, keyword: &str) -> blocked_keyword::Model {
        blocked_keyword::Model {
            id: id.to_string(),
            keyword: keyword.to_string(),
            pattern_type: PatternType::Contains,
            severity: Severity::Block,
            enabled: true,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_enabled() {
        let kw1 = test_keyword("kw1", "fake rolex");
        let kw2 = test_keyword("kw2", "counterfeit");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[kw1, kw2]])
                .into_connection(),
        );

        let repo = KeywordRepository::new(db);
        let rules = repo.find_enabled().await.unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].keyword, "fake rolex");
    }
}
