use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lessonplan::config::Config;
use lessonplan::db::UserDbManager;
use lessonplan::server::create_router;
use lessonplan::store::JsonFileStore;
use lessonplan::types::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lessonplan=info,tower_http=info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("lessonplan.json"));
    let config = Config::load(&config_path)?.apply_env()?;

    let store = JsonFileStore::new(&config.storage.data_dir).with_context(|| {
        format!(
            "failed to create data directory {}",
            config.storage.data_dir.display()
        )
    })?;
    info!("Data directory: {}", store.data_dir().display());

    if let Some(parent) = config.storage.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let users = UserDbManager::open(&config.storage.db_path).with_context(|| {
        format!("failed to open {}", config.storage.db_path.display())
    })?;

    info!(
        "Rescheduling with collision policy {:?}, at most {} lectures per day",
        config.reschedule.collision_policy, config.reschedule.max_lectures_per_day
    );

    let state = Arc::new(AppState::new(Arc::new(store), users, &config));
    let app = create_router(state, &config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
