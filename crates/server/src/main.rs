//! Marquee server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use fred::interfaces::ClientLike;
use marquee_api::{middleware::AppState, router as api_router};
use marquee_common::Config;
use marquee_core::{BannerService, RedisCache, SelectionEngine, SystemClock};
use marquee_db::repositories::BannerRepository;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
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
                .unwrap_or_else(|_| "marquee=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting marquee server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = marquee_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    marquee_db::migrate(&db).await?;
    info!("Migrations completed");

    // Connect to Redis
    info!("Connecting to Redis...");
    let redis_config = fred::types::config::Config::from_url(&config.redis.url)?;
    let redis_client = fred::clients::Client::new(redis_config, None, None, None);
    redis_client.connect();
    redis_client.wait_for_connect().await?;
    let redis_client = Arc::new(redis_client);
    info!("Connected to Redis");

    // Initialize repositories and services
    let db = Arc::new(db);
    let banner_repo = BannerRepository::new(Arc::clone(&db));

    let cache = Arc::new(RedisCache::new(
        Arc::clone(&redis_client),
        config.redis.prefix.clone(),
    ));
    let clock = Arc::new(SystemClock);

    let selection_engine = SelectionEngine::new(banner_repo.clone(), cache, clock.clone())
        .with_cache_ttl(config.cache.ttl_secs);
    let banner_service = BannerService::new(banner_repo, selection_engine.clone(), clock);

    // Create app state
    let state = AppState {
        banner_service,
        selection_engine,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

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
