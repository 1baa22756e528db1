use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use safestep_alerts::adapters::{
    EmailConfirmationSender, EmailNotificationSender, PgAlertStore, PgContactDirectory,
};
use safestep_alerts::{AlertDispatcher, AlertLifecycleManager, AlertStore};
use safestep_api::config::ServerConfig;
use safestep_api::router::build_app_router;
use safestep_api::state::AppState;
use safestep_notify::{EmailConfig, EmailDelivery};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "safestep_api=debug,safestep_alerts=debug,tower_http=debug".into()
    });
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = safestep_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    safestep_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    safestep_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Email ---
    let delivery = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(
                smtp_host = %email_config.smtp_host,
                smtp_port = email_config.smtp_port,
                "SMTP email delivery enabled",
            );
            Some(Arc::new(
                EmailDelivery::new(email_config).expect("Invalid SMTP_FROM address"),
            ))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; alert emails will be recorded as failed");
            None
        }
    };
    let delivery_timeout = Duration::from_secs(config.alert_delivery_timeout_secs);

    // --- Alert services ---
    let alerts: Arc<dyn AlertStore> = Arc::new(PgAlertStore::new(pool.clone()));
    let dispatcher = Arc::new(AlertDispatcher::new(
        Arc::new(PgContactDirectory::new(pool.clone())),
        Arc::clone(&alerts),
        Arc::new(EmailNotificationSender::new(delivery.clone(), delivery_timeout)),
        Arc::new(EmailConfirmationSender::new(delivery, delivery_timeout)),
    ));
    let lifecycle = Arc::new(AlertLifecycleManager::new(Arc::clone(&alerts)));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        alerts,
        dispatcher: Arc::clone(&dispatcher),
        lifecycle,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining alert deliveries");

    let drained = dispatcher
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;
    if drained {
        tracing::info!("Alert deliveries drained");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM (on Unix) to start graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
