//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware as axum_middleware,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;
use tradepost_api::{
    middleware::{AppState, auth_middleware},
    router as api_router,
};
use tradepost_core::services::{
    ContentFilterService, EscalationService, LogNotifier, ModerationService, ReportService,
};
use tradepost_db::entities::{blocked_keyword, moderation_action, report, user};
use tradepost_db::repositories::{
    ContentRepository, FilterLogRepository, KeywordRepository, ModerationRepository,
    ReportRepository, UserRepository,
};

fn test_user(id: &str, is_moderator: bool) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: format!("user-{id}"),
        token: Some(format!("token-{id}")),
        is_moderator,
        is_banned: false,
        created_at: Utc::now().into(),
    }
}

/// Create test app state over the given mock connection.
fn create_test_state(db: DatabaseConnection, scheduler_secret: Option<String>) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let keyword_repo = KeywordRepository::new(Arc::clone(&db));
    let filter_log_repo = FilterLogRepository::new(Arc::clone(&db));
    let moderation_repo = ModerationRepository::new(Arc::clone(&db));
    let content_repo = ContentRepository::new(Arc::clone(&db));

    let content_filter_service = ContentFilterService::new(keyword_repo, filter_log_repo);
    let report_service = ReportService::new(report_repo.clone(), user_repo.clone(), 24);
    let moderation_service = ModerationService::new(
        moderation_repo,
        report_repo.clone(),
        content_repo,
        user_repo.clone(),
    );
    let escalation_service = EscalationService::new(
        report_repo,
        moderation_service.clone(),
        Arc::new(LogNotifier),
        50,
        Duration::from_secs(10),
    );

    AppState {
        content_filter_service,
        report_service,
        moderation_service,
        escalation_service,
        user_repo,
        scheduler_secret,
    }
}

/// Router with the auth middleware attached, as the server wires it.
fn create_test_router(db: DatabaseConnection, scheduler_secret: Option<String>) -> Router {
    let state = create_test_state(db, scheduler_secret);
    api_router()
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

#[tokio::test]
async fn test_content_filter_requires_auth() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/content-filter")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"content":"hello","contentType":"item_title"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_content_filter_allows_clean_content() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // token lookup, then enabled rule scan
        .append_query_results([[test_user("user1", false)]])
        .append_query_results([Vec::<blocked_keyword::Model>::new()])
        .into_connection();

    let app = create_test_router(db, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/content-filter")
                .method("POST")
                .header("Authorization", "Bearer token-user1")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"content":"a perfectly honest listing","contentType":"item_title"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_report_create_requires_auth() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/report-create")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"targetType":"item","targetId":"item1","category":"spam"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_moderation_list_rejects_regular_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("user1", false)]])
        .into_connection();

    let app = create_test_router(db, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/moderation/reports/list")
                .method("POST")
                .header("Authorization", "Bearer token-user1")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_moderation_list_returns_reports_for_moderator() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("mod1", true)]])
        .append_query_results([Vec::<report::Model>::new()])
        .into_connection();

    let app = create_test_router(db, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/moderation/reports/list")
                .method("POST")
                .header("Authorization", "Bearer token-mod1")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_actions_list_returns_audit_trail_for_moderator() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("mod1", true)]])
        .append_query_results([Vec::<moderation_action::Model>::new()])
        .into_connection();

    let app = create_test_router(db, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/moderation/actions/list")
                .method("POST")
                .header("Authorization", "Bearer token-mod1")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_filter_history_rejects_regular_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("user1", false)]])
        .into_connection();

    let app = create_test_router(db, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/moderation/filter-log/list")
                .method("POST")
                .header("Authorization", "Bearer token-user1")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"userId":"user2"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_escalation_trigger_rejects_anonymous() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db, Some("sweep-secret".to_string()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/report-escalation")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_escalation_trigger_rejects_wrong_secret() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db, Some("sweep-secret".to_string()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/report-escalation")
                .method("POST")
                .header("x-scheduler-secret", "guess")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_escalation_trigger_accepts_scheduler_secret() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // overdue scan comes back empty
        .append_query_results([Vec::<report::Model>::new()])
        .into_connection();

    let app = create_test_router(db, Some("sweep-secret".to_string()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/report-escalation")
                .method("POST")
                .header("x-scheduler-secret", "sweep-secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
