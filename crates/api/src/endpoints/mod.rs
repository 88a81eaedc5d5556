//! API endpoints.

mod content_filter;
mod escalation;
mod moderation;
mod reports;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(content_filter::router())
        .merge(reports::router())
        .merge(escalation::router())
        .nest("/moderation", moderation::router())
}
