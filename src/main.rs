//! codearena - Application Entry Point

use std::net::SocketAddr;

use axum::Router;
use redis::Client as RedisClient;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codearena::{
    bus::ExecutorClient,
    cache::Cache,
    config::CONFIG,
    db,
    handlers,
    leaderboard::Leaderboard,
    scheduler::SyncScheduler,
    services::LeaderboardService,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting codearena problem service...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Initialize Redis connections for the cache and the leaderboard index
    tracing::info!("Connecting to Redis...");
    let redis_client = RedisClient::open(CONFIG.redis.url.as_str())?;
    let cache_conn = redis::aio::ConnectionManager::new(redis_client.clone()).await?;
    let board_conn = redis::aio::ConnectionManager::new(redis_client).await?;

    let cache = Cache::new(cache_conn);
    let leaderboard = Leaderboard::new(
        board_conn,
        CONFIG.leaderboard.namespace.clone(),
        CONFIG.leaderboard.top_k,
    );

    // Initialize the executor bus client
    tracing::info!("Connecting to NATS...");
    let executor = ExecutorClient::connect(&CONFIG.nats.url).await?;

    // Warm the leaderboard index; a failed warm run is not fatal
    if let Err(e) = LeaderboardService::sync_leaderboard(&db_pool, &leaderboard).await {
        tracing::error!("initial leaderboard sync failed: {}", e);
    }

    // Start the periodic full resync
    let sync_scheduler = SyncScheduler::new(db_pool.clone(), leaderboard.clone()).await?;
    sync_scheduler.start(&CONFIG.leaderboard.sync_cron).await?;

    // Create application state
    let state = AppState::new(db_pool, cache, leaderboard, executor, CONFIG.clone());

    // Build the router
    let app = Router::new()
        .nest("/api/v1", handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
