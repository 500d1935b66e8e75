use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::{signal, sync::mpsc};
use tracing::{error, info};

use discounts_api as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db = api::db::establish_connection(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let (event_tx, event_rx) = mpsc::channel(1024);
    let event_sender = api::events::EventSender::new(event_tx);
    tokio::spawn(api::events::process_events(event_rx));

    let mut plugins = api::plugins::PluginManager::new();
    plugins.register(Arc::new(api::plugins::LoggingPlugin));

    api::services::sale_toggle::start_worker(
        Arc::new(db.clone()),
        plugins.clone(),
        event_sender.clone(),
        Duration::from_secs(cfg.sale_toggle_interval_secs),
    );

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port).parse()?;
    let state = api::AppState::new(db, cfg, event_sender, plugins);
    let router = api::app_router(state);

    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("failed to install shutdown signal handler: {e}");
    }
    info!("shutdown signal received");
}
