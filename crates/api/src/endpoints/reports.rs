//! Report intake endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Serialize;
use tradepost_common::AppResult;
use tradepost_core::services::report::CreateReportInput;
use tradepost_db::entities::report::{self, ReportStatus, TargetType};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub reporter_id: String,
    pub target_type: TargetType,
    pub target_id: String,
    pub category: String,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub created_at: String,
    pub needs_action_by: String,
    pub first_response_at: Option<String>,
    pub resolved_at: Option<String>,
    pub resolved_by: Option<String>,
    pub resolution_notes: Option<String>,
    pub auto_escalated: bool,
}

impl From<report::Model> for ReportResponse {
    fn from(r: report::Model) -> Self {
        Self {
            id: r.id,
            reporter_id: r.reporter_id,
            target_type: r.target_type,
            target_id: r.target_id,
            category: r.category,
            description: r.description,
            status: r.status,
            created_at: r.created_at.to_rfc3339(),
            needs_action_by: r.needs_action_by.to_rfc3339(),
            first_response_at: r.first_response_at.map(|dt| dt.to_rfc3339()),
            resolved_at: r.resolved_at.map(|dt| dt.to_rfc3339()),
            resolved_by: r.resolved_by,
            resolution_notes: r.resolution_notes,
            auto_escalated: r.auto_escalated,
        }
    }
}

/// Acknowledgement returned to the reporter on intake.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReportResponse {
    pub report: CreatedReport,
}

/// Minimal view of a freshly filed report.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReport {
    pub id: String,
    pub status: ReportStatus,
    pub created_at: String,
}

/// Submit a report against a target entity.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReportInput>,
) -> AppResult<(StatusCode, ApiResponse<CreatedReportResponse>)> {
    let report = state.report_service.create_report(&user.id, input).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(CreatedReportResponse {
            report: CreatedReport {
                id: report.id,
                status: report.status,
                created_at: report.created_at.to_rfc3339(),
            },
        }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/report-create", post(create))
}
