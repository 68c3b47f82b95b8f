pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod http;
pub mod models;
pub mod query;
mod utils;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::AppConfig;
use db::Store;
use http::AppState;

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
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
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load();
    init_tracing(config.log_json);

    let db_path = config.database_path();
    {
        let store = Store::open(&db_path)
            .with_context(|| format!("failed to open database {}", db_path.display()))?;
        if config.seed_demo_data && store.seed_if_empty(Utc::now())? {
            tracing::info!(path = %db_path.display(), "seeded demo directory");
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&config.bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", config.bind_addr))?;
        tracing::info!(addr = %config.bind_addr, database = %db_path.display(), "serving booking directory");

        let router = http::router(AppState::new(db_path));
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("http server error")?;
        Ok(())
    })
}
