//! Moderator action execution.
//!
//! Every mutation a moderator (or the escalation sweep) performs flows
//! through here, so each one leaves exactly one audit trail entry.

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use tradepost_common::{AppError, AppResult, IdGenerator};
use tradepost_db::entities::moderation_action::{self, ActionType};
use tradepost_db::entities::report::{ReportStatus, TargetType};
use tradepost_db::repositories::{
    ContentRepository, ModerationRepository, Remediation, ReportRepository, UserRepository,
};

/// Moderator identity recorded on sweep-initiated actions.
pub const SYSTEM_MODERATOR_ID: &str = "system";

/// Summary of a report's target, for moderator review.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPreview {
    pub target_type: TargetType,
    pub target_id: String,
    /// Whether the target still exists in its owning table.
    pub exists: bool,
    /// Whether the target has already been removed or banned.
    pub already_actioned: bool,
    /// Short human-readable description of the target.
    pub summary: Option<String>,
}

/// Moderation service for business logic.
#[derive(Clone)]
pub struct ModerationService {
    moderation_repo: ModerationRepository,
    report_repo: ReportRepository,
    content_repo: ContentRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        moderation_repo: ModerationRepository,
        report_repo: ReportRepository,
        content_repo: ContentRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            moderation_repo,
            report_repo,
            content_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    fn action_model(
        &self,
        moderator_id: &str,
        action_type: ActionType,
        target_type: TargetType,
        target_id: &str,
        report_id: Option<&str>,
        notes: Option<&str>,
    ) -> moderation_action::ActiveModel {
        moderation_action::ActiveModel {
            id: Set(self.id_gen.generate()),
            moderator_id: Set(moderator_id.to_string()),
            action_type: Set(action_type),
            target_type: Set(target_type),
            target_id: Set(target_id.to_string()),
            report_id: Set(report_id.map(ToString::to_string)),
            notes: Set(notes.map(ToString::to_string)),
            created_at: Set(Utc::now().into()),
        }
    }

    /// Remove an item or message from public view.
    ///
    /// Removal is idempotent on the target, but every invocation records
    /// its own audit entry. A target that does not exist at all is
    /// `NotFound`.
    pub async fn remove_content(
        &self,
        moderator_id: &str,
        target_type: TargetType,
        target_id: &str,
        report_id: Option<&str>,
        notes: Option<&str>,
    ) -> AppResult<moderation_action::Model> {
        match target_type {
            TargetType::Item => {
                self.content_repo
                    .find_item(target_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Item {target_id} not found")))?;
                self.content_repo.mark_item_removed(target_id).await?;
            }
            TargetType::Message => {
                self.content_repo
                    .find_message(target_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Message {target_id} not found")))?;
                self.content_repo.mark_message_removed(target_id).await?;
            }
            _ => {
                return Err(AppError::Validation(format!(
                    "Cannot remove content of type {target_type:?}"
                )));
            }
        }

        tracing::info!(moderator_id, target_id, ?target_type, "Content removed");

        self.moderation_repo
            .create_action(self.action_model(
                moderator_id,
                ActionType::RemoveContent,
                target_type,
                target_id,
                report_id,
                notes,
            ))
            .await
    }

    /// Ban a user, revoking authentication.
    pub async fn ban_user(
        &self,
        moderator_id: &str,
        user_id: &str,
        report_id: Option<&str>,
        notes: Option<&str>,
    ) -> AppResult<moderation_action::Model> {
        // Surface a 404 for unknown users before mutating anything.
        self.user_repo.get_by_id(user_id).await?;
        self.user_repo.set_banned(user_id).await?;

        tracing::info!(moderator_id, user_id, "User banned");

        self.moderation_repo
            .create_action(self.action_model(
                moderator_id,
                ActionType::BanUser,
                TargetType::User,
                user_id,
                report_id,
                notes,
            ))
            .await
    }

    /// Record a warning against a user. No target state changes; the
    /// audit entry is the warning.
    pub async fn warn_user(
        &self,
        moderator_id: &str,
        user_id: &str,
        report_id: Option<&str>,
        notes: Option<&str>,
    ) -> AppResult<moderation_action::Model> {
        self.user_repo.get_by_id(user_id).await?;

        self.moderation_repo
            .create_action(self.action_model(
                moderator_id,
                ActionType::WarnUser,
                TargetType::User,
                user_id,
                report_id,
                notes,
            ))
            .await
    }

    /// Resolve a report, optionally remediating its target in the same
    /// transaction as the status transition and audit entry.
    ///
    /// Resolution always carries notes; dismissal does not require them.
    pub async fn resolve_report(
        &self,
        moderator_id: &str,
        report_id: &str,
        action_type: ActionType,
        notes: Option<&str>,
    ) -> AppResult<moderation_action::Model> {
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        let Some(notes) = notes else {
            return Err(AppError::Validation(
                "resolutionNotes is required to resolve a report".to_string(),
            ));
        };

        let report = self.report_repo.get_by_id(report_id).await?;

        let remediation = match action_type {
            ActionType::RemoveContent => match report.target_type {
                TargetType::Item => Some(Remediation::RemoveItem(report.target_id.clone())),
                TargetType::Message => Some(Remediation::RemoveMessage(report.target_id.clone())),
                _ => {
                    return Err(AppError::Validation(format!(
                        "Cannot remove content of type {:?}",
                        report.target_type
                    )));
                }
            },
            ActionType::BanUser => {
                if report.target_type != TargetType::User {
                    return Err(AppError::Validation(
                        "Can only ban reports targeting a user".to_string(),
                    ));
                }
                Some(Remediation::BanUser(report.target_id.clone()))
            }
            ActionType::WarnUser | ActionType::DismissReport => None,
        };

        let action = self.action_model(
            moderator_id,
            action_type,
            report.target_type,
            &report.target_id,
            Some(report_id),
            Some(notes),
        );

        let recorded = self
            .moderation_repo
            .close_report_with_action(
                report_id,
                ReportStatus::Resolved,
                moderator_id,
                Some(notes),
                remediation.as_ref(),
                action,
                Utc::now(),
            )
            .await?;

        tracing::info!(moderator_id, report_id, ?action_type, "Report resolved");

        Ok(recorded)
    }

    /// Dismiss a report without touching its target.
    pub async fn dismiss_report(
        &self,
        moderator_id: &str,
        report_id: &str,
        notes: Option<&str>,
    ) -> AppResult<moderation_action::Model> {
        let report = self.report_repo.get_by_id(report_id).await?;

        let action = self.action_model(
            moderator_id,
            ActionType::DismissReport,
            report.target_type,
            &report.target_id,
            Some(report_id),
            notes,
        );

        let recorded = self
            .moderation_repo
            .close_report_with_action(
                report_id,
                ReportStatus::Dismissed,
                moderator_id,
                notes,
                None,
                action,
                Utc::now(),
            )
            .await?;

        tracing::info!(moderator_id, report_id, "Report dismissed");

        Ok(recorded)
    }

    /// List the audit trail for a report, oldest first.
    pub async fn actions_for_report(
        &self,
        report_id: &str,
    ) -> AppResult<Vec<moderation_action::Model>> {
        self.moderation_repo.list_actions_for_report(report_id).await
    }

    /// List recent actions across all reports, newest first.
    pub async fn recent_actions(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation_action::Model>> {
        self.moderation_repo.list_recent_actions(limit, offset).await
    }

    /// Summarize a report's target so a moderator can review it without
    /// leaving the queue.
    pub async fn target_preview(
        &self,
        target_type: TargetType,
        target_id: &str,
    ) -> AppResult<TargetPreview> {
        let (exists, already_actioned, summary) = match target_type {
            TargetType::Item => match self.content_repo.find_item(target_id).await? {
                Some(item) => (true, item.removed, Some(item.title)),
                None => (false, false, None),
            },
            TargetType::Message => match self.content_repo.find_message(target_id).await? {
                Some(msg) => {
                    let preview: String = msg.text.chars().take(200).collect();
                    (true, msg.removed, Some(preview))
                }
                None => (false, false, None),
            },
            TargetType::User => match self.user_repo.find_by_id(target_id).await? {
                Some(user) => (true, user.is_banned, Some(user.username)),
                None => (false, false, None),
            },
            TargetType::Comment | TargetType::Other => (false, false, None),
        };

        Ok(TargetPreview {
            target_type,
            target_id: target_id.to_string(),
            exists,
            already_actioned,
            summary,
        })
    }
}
