//! Report repository.
//!
//! Status transitions and escalation marking are conditional updates
//! keyed on the current row state, so racing writers resolve to exactly
//! one winner without application-level locks.

use std::sync::Arc;

use crate::entities::{
    Report,
    report::{self, ReportStatus},
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tradepost_common::{AppError, AppResult};

/// Statuses that still accept transitions.
const OPEN_STATUSES: [ReportStatus; 2] = [ReportStatus::Pending, ReportStatus::InReview];

/// Move a report into a terminal status if it is still open.
///
/// Returns the number of rows updated: zero means the report was already
/// terminal (or does not exist) and the caller lost the race.
pub(crate) async fn exec_terminal_transition<C: ConnectionTrait>(
    conn: &C,
    id: &str,
    to: ReportStatus,
    resolved_by: &str,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = Report::update_many()
        .col_expr(report::Column::Status, Expr::value(to))
        .col_expr(report::Column::ResolvedAt, Expr::value(now))
        .col_expr(report::Column::ResolvedBy, Expr::value(resolved_by))
        .col_expr(report::Column::ResolutionNotes, Expr::value(notes))
        // Stamp first response only if the report never left pending.
        .col_expr(
            report::Column::FirstResponseAt,
            Func::coalesce([
                Expr::col(report::Column::FirstResponseAt).into(),
                Expr::value(now),
            ])
            .into(),
        )
        .filter(report::Column::Id.eq(id))
        .filter(report::Column::Status.is_in(OPEN_STATUSES))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReportNotFound(id.to_string()))
    }

    /// List reports with an optional status filter, newest first.
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        let mut query = Report::find().order_by_desc(report::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(report::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reports still pending.
    pub async fn count_pending(&self) -> AppResult<u64> {
        Report::find()
            .filter(report::Column::Status.eq(ReportStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find open reports past their SLA deadline and not yet escalated,
    /// oldest deadline first, bounded by `limit`.
    pub async fn find_overdue(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::Status.is_in(OPEN_STATUSES))
            .filter(report::Column::NeedsActionBy.lt(now))
            .filter(report::Column::AutoEscalated.eq(false))
            .order_by_asc(report::Column::NeedsActionBy)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Move a pending report to `in_review`, stamping `first_response_at`.
    ///
    /// Returns false when the report was not pending (already under
    /// review or terminal).
    pub async fn begin_review(&self, id: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let result = Report::update_many()
            .col_expr(report::Column::Status, Expr::value(ReportStatus::InReview))
            .col_expr(
                report::Column::FirstResponseAt,
                Func::coalesce([
                    Expr::col(report::Column::FirstResponseAt).into(),
                    Expr::value(now),
                ])
                .into(),
            )
            .filter(report::Column::Id.eq(id))
            .filter(report::Column::Status.eq(ReportStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Move an open report into a terminal status.
    ///
    /// Returns false when the report was already terminal.
    pub async fn transition_terminal(
        &self,
        id: &str,
        to: ReportStatus,
        resolved_by: &str,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let rows = exec_terminal_transition(self.db.as_ref(), id, to, resolved_by, notes, now)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows > 0)
    }

    /// Set `auto_escalated` on a report that has not been escalated yet.
    ///
    /// Compare-and-set: returns false when another sweep already claimed
    /// the report, making overlapping sweeps safe.
    pub async fn mark_escalated(&self, id: &str) -> AppResult<bool> {
        let result = Report::update_many()
            .col_expr(report::Column::AutoEscalated, Expr::value(true))
            .filter(report::Column::Id.eq(id))
            .filter(report::Column::AutoEscalated.eq(false))
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
    use crate::entities::report::TargetType;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_report(id: &str, status: ReportStatus) -> report::Model {
        let now = Utc::now();
        report::Model {
            id: id.to_string(),
            reporter_id: "user1".to_string(),
            target_type: TargetType::Item,
            target_id: "item1".to_string(),
            category: "counterfeit".to_string(),
            description: None,
            metadata: None,
            status,
            created_at: now.into(),
            needs_action_by: (now + chrono::Duration::hours(24)).into(),
            first_response_at: None,
            resolved_at: None,
            resolved_by: None,
            resolution_notes: None,
            auto_escalated: false,
        }
    }

    #[tokio::test]
    async fn test_find_overdue() {
        let overdue = test_report("report1", ReportStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[overdue]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let reports = repo.find_overdue(Utc::now(), 50).await.unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "report1");
    }

    #[tokio::test]
    async fn test_mark_escalated_wins_race() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        assert!(repo.mark_escalated("report1").await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_escalated_loses_race() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        assert!(!repo.mark_escalated("report1").await.unwrap());
    }

    #[tokio::test]
    async fn test_transition_terminal_rejected_for_terminal_report() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let moved = repo
            .transition_terminal(
                "report1",
                ReportStatus::Resolved,
                "mod1",
                Some("handled"),
                Utc::now(),
            )
            .await
            .unwrap();

        assert!(!moved);
    }
}
