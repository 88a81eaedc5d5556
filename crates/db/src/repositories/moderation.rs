//! Moderation action repository.

use std::sync::Arc;

use crate::entities::{
    Item, Message, ModerationAction, User, item, message, moderation_action,
    report::ReportStatus, user,
};
use crate::repositories::report::exec_terminal_transition;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tradepost_common::{AppError, AppResult};

/// Target mutation applied together with a report's terminal transition.
///
/// Each variant is a compare-and-set on the owning table, so re-applying
/// it is a no-op rather than an error.
#[derive(Debug, Clone)]
pub enum Remediation {
    /// Mark an item as removed.
    RemoveItem(String),
    /// Mark a message as removed.
    RemoveMessage(String),
    /// Ban a user account.
    BanUser(String),
}

async fn exec_remediation<C: ConnectionTrait>(
    conn: &C,
    remediation: &Remediation,
) -> Result<(), DbErr> {
    match remediation {
        Remediation::RemoveItem(id) => {
            Item::update_many()
                .col_expr(item::Column::Removed, Expr::value(true))
                .filter(item::Column::Id.eq(id))
                .filter(item::Column::Removed.eq(false))
                .exec(conn)
                .await?;
        }
        Remediation::RemoveMessage(id) => {
            Message::update_many()
                .col_expr(message::Column::Removed, Expr::value(true))
                .filter(message::Column::Id.eq(id))
                .filter(message::Column::Removed.eq(false))
                .exec(conn)
                .await?;
        }
        Remediation::BanUser(id) => {
            User::update_many()
                .col_expr(user::Column::IsBanned, Expr::value(true))
                .filter(user::Column::Id.eq(id))
                .filter(user::Column::IsBanned.eq(false))
                .exec(conn)
                .await?;
        }
    }

    Ok(())
}

/// Moderation action repository for the append-only audit trail, plus the
/// transactional resolve path that couples a remediation's audit entry to
/// the report's terminal transition.
#[derive(Clone)]
pub struct ModerationRepository {
    db: Arc<DatabaseConnection>,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an audit trail entry.
    pub async fn create_action(
        &self,
        model: moderation_action::ActiveModel,
    ) -> AppResult<moderation_action::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List actions recorded against a report, oldest first.
    pub async fn list_actions_for_report(
        &self,
        report_id: &str,
    ) -> AppResult<Vec<moderation_action::Model>> {
        ModerationAction::find()
            .filter(moderation_action::Column::ReportId.eq(report_id))
            .order_by_asc(moderation_action::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List recent actions across all reports, newest first.
    pub async fn list_recent_actions(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation_action::Model>> {
        ModerationAction::find()
            .order_by_desc(moderation_action::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Transition a report to a terminal status, apply the optional
    /// target remediation, and append the audit entry for the action
    /// that closed it, in one transaction.
    ///
    /// Either all writes land or none do, so a resolved report without
    /// an audit row (or the reverse) cannot be observed. Fails with
    /// `InvalidState` when the report is already terminal, leaving the
    /// target untouched.
    pub async fn close_report_with_action(
        &self,
        report_id: &str,
        to: ReportStatus,
        resolved_by: &str,
        notes: Option<&str>,
        remediation: Option<&Remediation>,
        action: moderation_action::ActiveModel,
        now: DateTime<Utc>,
    ) -> AppResult<moderation_action::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = exec_terminal_transition(&txn, report_id, to, resolved_by, notes, now)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if rows == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::InvalidState(format!(
                "Report {report_id} is already closed"
            )));
        }

        if let Some(r) = remediation {
            exec_remediation(&txn, r)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let recorded = action
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(recorded)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::{moderation_action::ActionType, report::TargetType};
    use sea_orm::{DatabaseBackend, MockDatabase, Set};

    fn test_action(id: &str) -> moderation_action::Model {
        moderation_action::Model {
            id: id.to_string(),
            moderator_id: "mod1".to_string(),
            action_type: ActionType::WarnUser,
            target_type: TargetType::User,
            target_id: "user2".to_string(),
            report_id: Some("report1".to_string()),
            notes: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_action() {
        let action = test_action("action1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[action.clone()]])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let model = moderation_action::ActiveModel {
            id: Set("action1".to_string()),
            moderator_id: Set("mod1".to_string()),
            action_type: Set(ActionType::WarnUser),
            target_type: Set(TargetType::User),
            target_id: Set("user2".to_string()),
            report_id: Set(Some("report1".to_string())),
            notes: Set(None),
            created_at: Set(Utc::now().into()),
        };

        let created = repo.create_action(model).await.unwrap();
        assert_eq!(created.id, "action1");
    }

    #[tokio::test]
    async fn test_list_actions_for_report() {
        let action = test_action("action1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[action]])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let actions = repo.list_actions_for_report("report1").await.unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].report_id.as_deref(), Some("report1"));
    }
}
