//! Content filter endpoint.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use tradepost_common::AppResult;
use tradepost_core::services::content_filter::{CheckContentInput, FilterVerdict};
use tradepost_db::entities::blocked_keyword::Severity;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// A matched rule in a filter check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedKeywordResponse {
    pub keyword_id: String,
    pub keyword: String,
    pub severity: Severity,
}

/// Content filter check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCheckResponse {
    pub allowed: bool,
    pub blocked: bool,
    pub warned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched_keywords: Vec<MatchedKeywordResponse>,
}

impl From<FilterVerdict> for FilterCheckResponse {
    fn from(v: FilterVerdict) -> Self {
        Self {
            allowed: v.allowed,
            blocked: v.blocked,
            warned: v.warned,
            message: v.message(),
            matched_keywords: v
                .matched
                .into_iter()
                .map(|m| MatchedKeywordResponse {
                    keyword_id: m.keyword_id,
                    keyword: m.keyword,
                    severity: m.severity,
                })
                .collect(),
        }
    }
}

/// Check content against the blocked keyword rules.
async fn check(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CheckContentInput>,
) -> AppResult<ApiResponse<FilterCheckResponse>> {
    let verdict = state
        .content_filter_service
        .check_content(&user.id, input)
        .await?;

    Ok(ApiResponse::ok(verdict.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/content-filter", post(check))
}
