//! Escalation sweep trigger endpoint.

use axum::{Router, extract::State, http::HeaderMap, routing::post};
use chrono::Utc;
use serde::Serialize;
use tradepost_common::{AppError, AppResult};

use crate::{extractors::AuthModerator, middleware::AppState, response::ApiResponse};

/// Header carrying the shared scheduler secret.
const SCHEDULER_SECRET_HEADER: &str = "x-scheduler-secret";

/// One automatic action taken by the sweep.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoActionResponse {
    /// ID of the escalated report.
    pub id: String,
    pub action: Option<tradepost_db::entities::moderation_action::ActionType>,
}

/// Sweep outcome response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResponse {
    pub escalated: usize,
    pub failed: usize,
    pub auto_actions: Vec<AutoActionResponse>,
}

/// Run an escalation sweep immediately.
///
/// Authorized either by the shared scheduler secret header or by a
/// moderator bearer token. An external cron can drive the sweep with
/// the secret alone; the periodic in-process scheduler does not use
/// this endpoint.
async fn trigger(
    moderator: Option<AuthModerator>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<SweepResponse>> {
    let secret_ok = match (&state.scheduler_secret, headers.get(SCHEDULER_SECRET_HEADER)) {
        (Some(expected), Some(provided)) => {
            provided.to_str().is_ok_and(|p| p == expected.as_str())
        }
        _ => false,
    };

    if !secret_ok && moderator.is_none() {
        return Err(AppError::Unauthorized);
    }

    let outcome = state.escalation_service.run_sweep(Utc::now()).await?;

    Ok(ApiResponse::ok(SweepResponse {
        escalated: outcome.escalated,
        failed: outcome.failed,
        auto_actions: outcome
            .actions
            .into_iter()
            .map(|a| AutoActionResponse {
                id: a.report_id,
                action: a.action,
            })
            .collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/report-escalation", post(trigger))
}
