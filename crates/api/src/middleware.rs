//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tradepost_core::services::{
    ContentFilterService, EscalationService, ModerationService, ReportService,
};
use tradepost_db::repositories::UserRepository;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub content_filter_service: ContentFilterService,
    pub report_service: ReportService,
    pub moderation_service: ModerationService,
    pub escalation_service: EscalationService,
    pub user_repo: UserRepository,
    /// Shared secret accepted by the escalation trigger endpoint.
    pub scheduler_secret: Option<String>,
}

/// Authentication middleware.
///
/// Resolves the bearer token to a user and stashes the model in request
/// extensions. Banned users never resolve, so their requests proceed
/// unauthenticated and fail at the extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(Some(user)) = state.user_repo.find_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
