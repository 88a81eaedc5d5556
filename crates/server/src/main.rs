//! Tradepost moderation server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware, routing::get};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradepost_api::{middleware::AppState, router as api_router};
use tradepost_common::Config;
use tradepost_core::services::{
    ContentFilterService, EscalationService, LogNotifier, ModerationService, ModeratorNotifier,
    ReportService, WebhookNotifier,
};
use tradepost_db::repositories::{
    ContentRepository, FilterLogRepository, KeywordRepository, ModerationRepository,
    ReportRepository, UserRepository,
};
use tradepost_queue::{SchedulerConfig, SweepExecutor, run_scheduler};

/// Bridges the escalation service into the periodic scheduler.
struct EscalationSweep {
    service: EscalationService,
}

#[async_trait::async_trait]
impl SweepExecutor for EscalationSweep {
    async fn run_sweep(&self) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        let outcome = self.service.run_sweep(chrono::Utc::now()).await?;
        Ok(outcome.escalated)
    }
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradepost=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting tradepost moderation server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = tradepost_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    tradepost_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let keyword_repo = KeywordRepository::new(Arc::clone(&db));
    let filter_log_repo = FilterLogRepository::new(Arc::clone(&db));
    let moderation_repo = ModerationRepository::new(Arc::clone(&db));
    let content_repo = ContentRepository::new(Arc::clone(&db));

    // Initialize services
    let content_filter_service = ContentFilterService::new(keyword_repo, filter_log_repo);
    let report_service = ReportService::new(
        report_repo.clone(),
        user_repo.clone(),
        config.moderation.sla_hours,
    );
    let moderation_service = ModerationService::new(
        moderation_repo,
        report_repo.clone(),
        content_repo,
        user_repo.clone(),
    );

    let notifier: Arc<dyn ModeratorNotifier> = match &config.moderation.notify_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(LogNotifier),
    };

    let escalation_service = EscalationService::new(
        report_repo,
        moderation_service.clone(),
        notifier,
        config.moderation.sweep_batch_size,
        Duration::from_secs(config.moderation.store_timeout_secs),
    );

    // Create app state
    let state = AppState {
        content_filter_service,
        report_service,
        moderation_service,
        escalation_service: escalation_service.clone(),
        user_repo,
        scheduler_secret: config.moderation.scheduler_secret.clone(),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tradepost_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the escalation scheduler
    info!(
        interval_secs = config.moderation.sweep_interval_secs,
        "Starting escalation scheduler..."
    );
    run_scheduler(
        SchedulerConfig {
            sweep_interval: Duration::from_secs(config.moderation.sweep_interval_secs),
        },
        Arc::new(EscalationSweep {
            service: escalation_service,
        }),
    )
    .await;

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
