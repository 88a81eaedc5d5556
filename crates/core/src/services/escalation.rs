//! SLA escalation sweep.
//!
//! Periodically scans for open reports past their `needs_action_by`
//! deadline, claims each one, applies the automatic remediation its
//! target admits, and notifies moderators once per sweep.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tradepost_common::{AppError, AppResult};
use tradepost_db::entities::moderation_action::ActionType;
use tradepost_db::entities::report::{self, TargetType};
use tradepost_db::repositories::ReportRepository;

use crate::services::moderation::{ModerationService, SYSTEM_MODERATOR_ID};
use crate::services::notifier::{EscalationNotice, ModeratorNotifier};

/// Notes stamped on sweep-initiated removals.
const ESCALATION_NOTES: &str = "Auto-escalated removal after SLA breach";

/// One report escalated by a sweep.
#[derive(Debug, Clone)]
pub struct SweepAction {
    pub report_id: String,
    /// The automatic action applied, when the target admitted one.
    pub action: Option<ActionType>,
}

/// Aggregate result of one escalation sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    /// Overdue reports found by the scan.
    pub scanned: usize,
    /// Reports this sweep claimed and escalated.
    pub escalated: usize,
    /// Reports another sweep claimed first.
    pub skipped: usize,
    /// Reports claimed but whose remediation failed.
    pub failed: usize,
    /// The escalations this sweep performed.
    pub actions: Vec<SweepAction>,
}

/// Escalation service driving the periodic sweep.
#[derive(Clone)]
pub struct EscalationService {
    report_repo: ReportRepository,
    moderation: ModerationService,
    notifier: Arc<dyn ModeratorNotifier>,
    batch_size: u64,
    store_timeout: Duration,
}

impl EscalationService {
    /// Create a new escalation service.
    #[must_use]
    pub fn new(
        report_repo: ReportRepository,
        moderation: ModerationService,
        notifier: Arc<dyn ModeratorNotifier>,
        batch_size: u64,
        store_timeout: Duration,
    ) -> Self {
        Self {
            report_repo,
            moderation,
            notifier,
            batch_size,
            store_timeout,
        }
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = AppResult<T>> + Send,
    ) -> AppResult<T> {
        tokio::time::timeout(self.store_timeout, fut)
            .await
            .map_err(|_| AppError::Dependency("Store call timed out".to_string()))?
    }

    /// Run one sweep against the given clock reading.
    ///
    /// Each overdue report is claimed with a compare-and-set on its
    /// `auto_escalated` flag before any remediation runs, so overlapping
    /// sweeps process a report at most once. A failure on one report is
    /// logged and the sweep moves on; the claim is not released, so a
    /// failed remediation waits for a moderator rather than retrying
    /// every interval.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        let overdue = self
            .with_timeout(self.report_repo.find_overdue(now, self.batch_size))
            .await?;

        let mut outcome = SweepOutcome {
            scanned: overdue.len(),
            ..SweepOutcome::default()
        };

        for report in &overdue {
            let claimed = match self
                .with_timeout(self.report_repo.mark_escalated(&report.id))
                .await
            {
                Ok(claimed) => claimed,
                Err(e) => {
                    tracing::error!(report_id = %report.id, error = %e, "Failed to claim overdue report");
                    outcome.failed += 1;
                    continue;
                }
            };

            if !claimed {
                outcome.skipped += 1;
                continue;
            }

            match self.with_timeout(self.remediate(report)).await {
                Ok(action) => {
                    outcome.escalated += 1;
                    outcome.actions.push(SweepAction {
                        report_id: report.id.clone(),
                        action,
                    });
                    tracing::info!(
                        report_id = %report.id,
                        target_type = ?report.target_type,
                        "Report auto-escalated after SLA breach"
                    );
                }
                Err(e) => {
                    outcome.failed += 1;
                    tracing::error!(
                        report_id = %report.id,
                        error = %e,
                        "Escalation remediation failed"
                    );
                }
            }
        }

        if outcome.escalated > 0 || outcome.failed > 0 {
            let notice = EscalationNotice {
                escalated: outcome.escalated,
                report_ids: outcome.actions.iter().map(|a| a.report_id.clone()).collect(),
                failed: outcome.failed,
            };
            // The side-channel runs under the same timeout as store
            // calls; a hung webhook must not stall the next tick.
            if let Err(e) = self
                .with_timeout(self.notifier.notify_escalation(&notice))
                .await
            {
                tracing::error!(error = %e, "Failed to deliver escalation notice");
            }
        }

        Ok(outcome)
    }

    /// Apply the automatic remediation an overdue report admits.
    ///
    /// Item and message targets are removed under the system identity.
    /// User and other targets carry no safe automatic action; the claim
    /// and the notification are the whole escalation.
    async fn remediate(&self, report: &report::Model) -> AppResult<Option<ActionType>> {
        match report.target_type {
            TargetType::Item | TargetType::Message => {
                self.moderation
                    .remove_content(
                        SYSTEM_MODERATOR_ID,
                        report.target_type,
                        &report.target_id,
                        Some(&report.id),
                        Some(ESCALATION_NOTES),
                    )
                    .await?;
                Ok(Some(ActionType::RemoveContent))
            }
            TargetType::User | TargetType::Comment | TargetType::Other => Ok(None),
        }
    }
}
