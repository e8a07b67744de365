//! TechSprint registration backend entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use techsprint_api::{middleware::AppState, router as api_router};
use techsprint_common::{Config, LocalStorage};
use techsprint_core::{
    ActionLogService, AdminService, EmailAccountService, EmailService, EventPublisher,
    GroupLinkService, OutboxProcessor, QrService, RegistrantEvent, RegistrationService,
    SmtpMailer, VerificationService,
};
use techsprint_db::repositories::{
    ActionLogRepository, AdminRepository, AdminSessionRepository, EmailAccountRepository,
    GroupLinkRepository, NotificationOutboxRepository, QrCodeRepository, RegistrantRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "techsprint=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting TechSprint registration backend...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = techsprint_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    techsprint_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let registrant_repo = RegistrantRepository::new(Arc::clone(&db));
    let qr_repo = QrCodeRepository::new(Arc::clone(&db));
    let admin_repo = AdminRepository::new(Arc::clone(&db));
    let session_repo = AdminSessionRepository::new(Arc::clone(&db));
    let email_account_repo = EmailAccountRepository::new(Arc::clone(&db));
    let group_link_repo = GroupLinkRepository::new(Arc::clone(&db));
    let action_log_repo = ActionLogRepository::new(Arc::clone(&db));
    let outbox_repo = NotificationOutboxRepository::new(Arc::clone(&db));

    // Initialize services
    let events = EventPublisher::new();
    let storage = Arc::new(LocalStorage::new(
        PathBuf::from(&config.storage.base_path),
        config.storage.base_url.clone(),
    ));

    let admin_service = AdminService::new(
        admin_repo,
        session_repo,
        config.auth.session_ttl_minutes,
    );
    let registration_service = RegistrationService::new(
        registrant_repo.clone(),
        qr_repo.clone(),
        storage,
        events.clone(),
    );
    let verification_service = VerificationService::new(
        registrant_repo,
        action_log_repo.clone(),
        outbox_repo.clone(),
        events.clone(),
    );
    let qr_service = QrService::new(qr_repo);
    let group_link_service = GroupLinkService::new(
        group_link_repo,
        config.event.fallback_group_link.clone(),
    );
    let email_service = EmailService::new(
        email_account_repo.clone(),
        Arc::new(SmtpMailer),
        config.event.name.clone(),
    );
    let email_account_service = EmailAccountService::new(email_account_repo);
    let action_log_service = ActionLogService::new(action_log_repo);

    // Notification outbox worker
    let outbox = OutboxProcessor::new(
        outbox_repo,
        group_link_service.clone(),
        email_service,
        config.outbox.max_attempts,
    );
    tokio::spawn(outbox.run(Duration::from_secs(config.outbox.poll_interval_secs)));
    info!("Notification outbox worker started");

    // Reconciliation sweep: the push channel is the primary signal, this
    // tick is the fallback that keeps consoles honest
    let reconcile_events = events.clone();
    let reconcile_interval = config.server.reconcile_interval_secs;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(reconcile_interval));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            reconcile_events.publish(RegistrantEvent::Reconcile);
        }
    });

    let state = AppState {
        admin_service,
        registration_service,
        verification_service,
        qr_service,
        group_link_service,
        email_account_service,
        action_log_service,
        events,
    };

    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            techsprint_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
