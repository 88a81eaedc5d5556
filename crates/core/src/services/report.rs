//! Report service: intake and lifecycle.
//!
//! Reports move `pending → in_review → {resolved, dismissed}`, with a
//! direct `pending → terminal` fast path. Terminal states accept no
//! further transitions.

use chrono::{Duration, Utc};
use sea_orm::Set;
use serde::Deserialize;
use tradepost_common::{AppError, AppResult, IdGenerator};
use tradepost_db::entities::report::{self, ReportStatus, TargetType};
use tradepost_db::repositories::{ReportRepository, UserRepository};
use validator::Validate;

/// Input for creating a report.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    pub target_type: TargetType,
    #[validate(length(min = 1, max = 64))]
    pub target_id: String,
    #[validate(length(min = 1, max = 128))]
    pub category: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    user_repo: UserRepository,
    /// SLA window applied to new reports.
    sla_hours: i64,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        user_repo: UserRepository,
        sla_hours: i64,
    ) -> Self {
        Self {
            report_repo,
            user_repo,
            sla_hours,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new report against a target entity.
    ///
    /// The SLA deadline is stamped at intake: `needs_action_by` is
    /// `created_at` plus the configured window. Repeated reports against
    /// the same target are not deduplicated.
    pub async fn create_report(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        let target_id = input.target_id.trim();
        if target_id.is_empty() {
            return Err(AppError::Validation("targetId is required".to_string()));
        }

        let category = input.category.trim().to_lowercase();
        if category.is_empty() {
            return Err(AppError::Validation("category is required".to_string()));
        }

        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let now = Utc::now();
        let needs_action_by = now + Duration::hours(self.sla_hours);

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter_id.to_string()),
            target_type: Set(input.target_type),
            target_id: Set(target_id.to_string()),
            category: Set(category),
            description: Set(description),
            metadata: Set(input.metadata),
            status: Set(ReportStatus::Pending),
            created_at: Set(now.into()),
            needs_action_by: Set(needs_action_by.into()),
            first_response_at: Set(None),
            resolved_at: Set(None),
            resolved_by: Set(None),
            resolution_notes: Set(None),
            auto_escalated: Set(false),
        };

        self.report_repo.create(model).await
    }

    /// Get a report by ID.
    pub async fn get_report(&self, id: &str) -> AppResult<report::Model> {
        self.report_repo.get_by_id(id).await
    }

    /// List reports with an optional status filter.
    pub async fn list_reports(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo.list(status, limit, offset).await
    }

    /// Count reports still pending.
    pub async fn count_pending(&self) -> AppResult<u64> {
        self.report_repo.count_pending().await
    }

    /// Open a pending report for inspection, moving it to `in_review`.
    ///
    /// Stamps `first_response_at` on the first departure from pending.
    /// Re-opening a report already under review is a no-op; opening a
    /// terminal report fails with `InvalidState`.
    pub async fn begin_review(
        &self,
        moderator_id: &str,
        report_id: &str,
    ) -> AppResult<report::Model> {
        self.require_moderator(moderator_id).await?;

        let moved = self.report_repo.begin_review(report_id, Utc::now()).await?;
        let report = self.report_repo.get_by_id(report_id).await?;

        if !moved && report.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Report {report_id} is already closed"
            )));
        }

        Ok(report)
    }

    /// Verify the caller is a moderator.
    pub async fn require_moderator(&self, moderator_id: &str) -> AppResult<()> {
        let moderator = self.user_repo.get_by_id(moderator_id).await?;
        if !moderator.is_moderator {
            return Err(AppError::Forbidden(
                "Only moderators can manage reports".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> ReportService {
        let db = Arc::new(db);
        ReportService::new(
            ReportRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
            24,
        )
    }

    fn created_report(category: &str) -> report::Model {
        let now = Utc::now();
        report::Model {
            id: "report1".to_string(),
            reporter_id: "user1".to_string(),
            target_type: TargetType::Item,
            target_id: "item1".to_string(),
            category: category.to_string(),
            description: None,
            metadata: None,
            status: ReportStatus::Pending,
            created_at: now.into(),
            needs_action_by: (now + Duration::hours(24)).into(),
            first_response_at: None,
            resolved_at: None,
            resolved_by: None,
            resolution_notes: None,
            auto_escalated: false,
        }
    }

    #[tokio::test]
    async fn test_create_report_sets_pending_and_sla() {
        let expected = created_report("counterfeit");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[expected.clone()]])
            .into_connection();

        let service = service_with(db);
        let report = service
            .create_report(
                "user1",
                CreateReportInput {
                    target_type: TargetType::Item,
                    target_id: "item1".to_string(),
                    category: " Counterfeit ".to_string(),
                    description: None,
                    metadata: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Pending);
        assert!(!report.auto_escalated);

        let window = report.needs_action_by.signed_duration_since(report.created_at);
        assert_eq!(window, Duration::hours(24));
    }

    #[tokio::test]
    async fn test_count_pending() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(2))
            }]])
            .into_connection();

        let service = service_with(db);
        assert_eq!(service.count_pending().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_report_rejects_empty_target() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create_report(
                "user1",
                CreateReportInput {
                    target_type: TargetType::Item,
                    target_id: "   ".to_string(),
                    category: "spam".to_string(),
                    description: None,
                    metadata: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_report_rejects_empty_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create_report(
                "user1",
                CreateReportInput {
                    target_type: TargetType::User,
                    target_id: "user2".to_string(),
                    category: " \t ".to_string(),
                    description: None,
                    metadata: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
