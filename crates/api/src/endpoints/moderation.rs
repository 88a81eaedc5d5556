//! Moderator endpoints.
//!
//! All routes here require a moderator bearer token.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tradepost_common::AppResult;
use tradepost_core::services::moderation::TargetPreview;
use tradepost_db::entities::moderation_action::{self, ActionType};
use tradepost_db::entities::report::{ReportStatus, TargetType};

use tradepost_db::entities::content_filter_log::{self, ContentType, FilterAction};

use crate::endpoints::reports::ReportResponse;
use crate::{extractors::AuthModerator, middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// Moderation action response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub id: String,
    pub moderator_id: String,
    pub action_type: ActionType,
    pub target_type: TargetType,
    pub target_id: String,
    pub report_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<moderation_action::Model> for ActionResponse {
    fn from(a: moderation_action::Model) -> Self {
        Self {
            id: a.id,
            moderator_id: a.moderator_id,
            action_type: a.action_type,
            target_type: a.target_type,
            target_id: a.target_id,
            report_id: a.report_id,
            notes: a.notes,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// List reports request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsRequest {
    pub status: Option<ReportStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Show report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowReportRequest {
    pub report_id: String,
}

/// Report detail with its audit trail.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailResponse {
    #[serde(flatten)]
    pub report: ReportResponse,
    pub actions: Vec<ActionResponse>,
}

/// Resolve report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReportRequest {
    pub report_id: String,
    pub action_type: ActionType,
    pub notes: Option<String>,
}

/// Dismiss report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissReportRequest {
    pub report_id: String,
    pub notes: Option<String>,
}

/// Remove content request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveContentRequest {
    pub target_type: TargetType,
    pub target_id: String,
    pub report_id: Option<String>,
    pub notes: Option<String>,
}

/// Ban or warn user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionRequest {
    pub user_id: String,
    pub report_id: Option<String>,
    pub notes: Option<String>,
}

/// Target preview request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPreviewRequest {
    pub target_type: TargetType,
    pub target_id: String,
}

/// List recent actions request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActionsRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Filter history request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterHistoryRequest {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// One content filter audit entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterLogEntryResponse {
    pub id: String,
    pub user_id: String,
    pub content_type: ContentType,
    pub content_id: Option<String>,
    pub matched_keyword_id: String,
    pub action_taken: FilterAction,
    pub content_preview: String,
    pub created_at: String,
}

impl From<content_filter_log::Model> for FilterLogEntryResponse {
    fn from(e: content_filter_log::Model) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            content_type: e.content_type,
            content_id: e.content_id,
            matched_keyword_id: e.matched_keyword_id,
            action_taken: e.action_taken,
            content_preview: e.content_preview,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

/// A page of a user's filter history.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterHistoryResponse {
    pub entries: Vec<FilterLogEntryResponse>,
    pub total: u64,
}

/// Count of reports awaiting a first response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCountResponse {
    pub pending: u64,
}

const fn default_limit() -> u64 {
    50
}

// ==================== Handlers ====================

/// List reports, newest first, optionally filtered by status.
async fn list_reports(
    AuthModerator(_moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<ListReportsRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let limit = req.limit.min(100);
    let reports = state
        .report_service
        .list_reports(req.status, limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(
        reports.into_iter().map(Into::into).collect(),
    ))
}

/// Show a report with its audit trail.
async fn show_report(
    AuthModerator(_moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<ShowReportRequest>,
) -> AppResult<ApiResponse<ReportDetailResponse>> {
    let report = state.report_service.get_report(&req.report_id).await?;
    let actions = state
        .moderation_service
        .actions_for_report(&req.report_id)
        .await?;

    Ok(ApiResponse::ok(ReportDetailResponse {
        report: report.into(),
        actions: actions.into_iter().map(Into::into).collect(),
    }))
}

/// Open a report for review.
async fn review_report(
    AuthModerator(moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<ShowReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .begin_review(&moderator.id, &req.report_id)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Resolve a report, applying the chosen action to its target.
async fn resolve_report(
    AuthModerator(moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<ResolveReportRequest>,
) -> AppResult<ApiResponse<ActionResponse>> {
    let action = state
        .moderation_service
        .resolve_report(
            &moderator.id,
            &req.report_id,
            req.action_type,
            req.notes.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(action.into()))
}

/// Dismiss a report without acting on its target.
async fn dismiss_report(
    AuthModerator(moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<DismissReportRequest>,
) -> AppResult<ApiResponse<ActionResponse>> {
    let action = state
        .moderation_service
        .dismiss_report(&moderator.id, &req.report_id, req.notes.as_deref())
        .await?;

    Ok(ApiResponse::ok(action.into()))
}

/// Remove an item or message outside of any report.
async fn remove_content(
    AuthModerator(moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<RemoveContentRequest>,
) -> AppResult<ApiResponse<ActionResponse>> {
    let action = state
        .moderation_service
        .remove_content(
            &moderator.id,
            req.target_type,
            &req.target_id,
            req.report_id.as_deref(),
            req.notes.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(action.into()))
}

/// Ban a user.
async fn ban_user(
    AuthModerator(moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<UserActionRequest>,
) -> AppResult<ApiResponse<ActionResponse>> {
    let action = state
        .moderation_service
        .ban_user(
            &moderator.id,
            &req.user_id,
            req.report_id.as_deref(),
            req.notes.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(action.into()))
}

/// Warn a user.
async fn warn_user(
    AuthModerator(moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<UserActionRequest>,
) -> AppResult<ApiResponse<ActionResponse>> {
    let action = state
        .moderation_service
        .warn_user(
            &moderator.id,
            &req.user_id,
            req.report_id.as_deref(),
            req.notes.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(action.into()))
}

/// Count reports still waiting in the queue.
async fn pending_count(
    AuthModerator(_moderator): AuthModerator,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<PendingCountResponse>> {
    let pending = state.report_service.count_pending().await?;

    Ok(ApiResponse::ok(PendingCountResponse { pending }))
}

/// List recent actions across all reports, newest first.
async fn list_actions(
    AuthModerator(_moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<ListActionsRequest>,
) -> AppResult<ApiResponse<Vec<ActionResponse>>> {
    let limit = req.limit.min(100);
    let actions = state
        .moderation_service
        .recent_actions(limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(
        actions.into_iter().map(Into::into).collect(),
    ))
}

/// Page through a user's content filter history.
async fn filter_history(
    AuthModerator(_moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<FilterHistoryRequest>,
) -> AppResult<ApiResponse<FilterHistoryResponse>> {
    let limit = req.limit.min(100);
    let (entries, total) = state
        .content_filter_service
        .filter_history(&req.user_id, limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(FilterHistoryResponse {
        entries: entries.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Summarize a report target.
async fn target_preview(
    AuthModerator(_moderator): AuthModerator,
    State(state): State<AppState>,
    Json(req): Json<TargetPreviewRequest>,
) -> AppResult<ApiResponse<TargetPreview>> {
    let preview = state
        .moderation_service
        .target_preview(req.target_type, &req.target_id)
        .await?;

    Ok(ApiResponse::ok(preview))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/list", post(list_reports))
        .route("/reports/show", post(show_report))
        .route("/reports/review", post(review_report))
        .route("/reports/resolve", post(resolve_report))
        .route("/reports/dismiss", post(dismiss_report))
        .route("/reports/pending-count", post(pending_count))
        .route("/actions/list", post(list_actions))
        .route("/actions/remove-content", post(remove_content))
        .route("/actions/ban-user", post(ban_user))
        .route("/actions/warn-user", post(warn_user))
        .route("/filter-log/list", post(filter_history))
        .route("/target-preview", post(target_preview))
}
