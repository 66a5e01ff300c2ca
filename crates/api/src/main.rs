use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitalwatch_api::config::ServerConfig;
use vitalwatch_api::router::build_app_router;
use vitalwatch_api::state::AppState;
use vitalwatch_api::ws;
use vitalwatch_core::store::VitalStore;
use vitalwatch_db::PgStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitalwatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vitalwatch_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    vitalwatch_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    vitalwatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn VitalStore> = Arc::new(PgStore::new(pool));
    let state = AppState::new(store, config.clone());

    let broadcast_handle = ws::start_alert_broadcast(
        Arc::clone(&state.alerts),
        Arc::clone(&state.live.registry),
        config.live_feed_interval(),
        state.shutdown.child_token(),
    );
    tracing::info!(
        interval_secs = config.live_feed_interval_secs,
        "Alert broadcast started"
    );

    let shutdown = state.shutdown.clone();
    let registry = Arc::clone(&state.live.registry);
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, cleaning up");

    // Sessions unwind on their child tokens; anything left is told to close.
    shutdown.cancel();
    let ws_count = registry.subscriber_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    registry.shutdown_all().await;

    if tokio::time::timeout(config.shutdown_timeout(), broadcast_handle)
        .await
        .is_err()
    {
        tracing::warn!("Alert broadcast did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM, then cancel the root token so live
/// sessions close before the server drains.
async fn shutdown_signal(shutdown: CancellationToken) {
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

    shutdown.cancel();
}
