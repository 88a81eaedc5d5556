//! Moderator notification delivery.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tradepost_common::AppResult;

/// Per-request timeout on webhook delivery.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Summary delivered to moderators after an escalation sweep.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationNotice {
    /// Number of reports the sweep escalated.
    pub escalated: usize,
    /// IDs of the escalated reports.
    pub report_ids: Vec<String>,
    /// Number of reports whose remediation failed.
    pub failed: usize,
}

/// Sink for moderator-facing notifications.
#[async_trait]
pub trait ModeratorNotifier: Send + Sync {
    /// Deliver an escalation notice. Delivery failure must not fail the
    /// sweep that produced it.
    async fn notify_escalation(&self, notice: &EscalationNotice) -> AppResult<()>;
}

/// Notifier that posts a JSON payload to a configured webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a new webhook notifier.
    #[must_use]
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client, url }
    }
}

#[async_trait]
impl ModeratorNotifier for WebhookNotifier {
    async fn notify_escalation(&self, notice: &EscalationNotice) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(notice)
            .send()
            .await
            .map_err(|e| tradepost_common::AppError::Dependency(e.to_string()))?;

        if !response.status().is_success() {
            return Err(tradepost_common::AppError::Dependency(format!(
                "Notification webhook returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Fallback notifier that records the notice in the application log.
pub struct LogNotifier;

#[async_trait]
impl ModeratorNotifier for LogNotifier {
    async fn notify_escalation(&self, notice: &EscalationNotice) -> AppResult<()> {
        tracing::warn!(
            escalated = notice.escalated,
            failed = notice.failed,
            report_ids = ?notice.report_ids,
            "Reports auto-escalated after SLA breach"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notice = EscalationNotice {
            escalated: 2,
            report_ids: vec!["report1".to_string(), "report2".to_string()],
            failed: 0,
        };

        LogNotifier.notify_escalation(&notice).await.unwrap();
    }
}
