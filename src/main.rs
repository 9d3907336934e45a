// region:    --- Imports
use auction_market::config::Config;
use auction_market::database::DatabaseManager;
use auction_market::error::AppError;
use auction_market::router::create_router;
use auction_market::scheduler::SessionSweeper;
use auction_market::state::AppState;
use auction_market::store::{PgStore, SharedStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,auction_market=debug".into()),
        )
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    info!("{:<12} --> Configuration loaded", "Main");

    let db_manager = Arc::new(DatabaseManager::connect(&config).await?);
    if let Err(e) = db_manager.initialize_database(config.reset_database).await {
        error!("{:<12} --> Database initialization failed: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> Database initialized", "Main");

    let store: SharedStore = Arc::new(PgStore::new(Arc::clone(&db_manager)));

    SessionSweeper::new(
        Arc::clone(&store),
        Duration::from_secs(config.session_sweep_secs),
    )
    .start();
    info!("{:<12} --> Session sweeper started", "Main");

    let addr = config.server_address();
    let routes_all = create_router(AppState::new(store, config));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
