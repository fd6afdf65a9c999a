use std::sync::Arc;

use clap::Parser;
use linkshelf::config::{Cli, Config, default_config_dir, default_config_path};
use linkshelf::db::Database;
use linkshelf::handler::AppState;
use tokio::{signal, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // With --config the data (database, replica state) lives next to the
    // config file, otherwise under ~/.linkshelf/.
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::path::PathBuf::from("."));
            (path, dir)
        }
        None => (default_config_path(), default_config_dir()),
    };

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {:?}: {}", data_dir, e);
        std::process::exit(1);
    }

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("linkshelf.svc starting");

    let cfg = Config::new(&config_path.to_string_lossy()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });
    let db = Arc::new(Database::new(&cfg, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup database");
        std::process::exit(1);
    }));
    let state = AppState::new(&cfg, db.clone()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup rebrandly client");
        std::process::exit(1);
    });

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let cancellation_token = CancellationToken::new();
    let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel::<()>(1);

    // Push local writes to the Turso primary on an interval. A no-op for
    // purely local databases.
    let sync_db = db.clone();
    let sync_token = cancellation_token.clone();
    let sync_done = shutdown_complete_tx.clone();
    let sync_every = std::time::Duration::from_secs(cfg.app.sync_interval_seconds.max(1));
    tokio::spawn(async move {
        let _done = sync_done;
        let mut interval = tokio::time::interval(sync_every);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = sync_db.sync().await {
                        tracing::warn!("Failed to sync database: {}", e);
                    }
                }
                _ = sync_token.cancelled() => {
                    tracing::info!("Database sync task shutting down");
                    break;
                }
            }
        }
    });

    let app = linkshelf::router(state);

    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("linkshelf.svc running on {}", &address);
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server exited with error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("ctrl+c signal received, preparing to shutdown");
            cancellation_token.cancel();
        }
    }

    drop(shutdown_complete_tx);
    shutdown_complete_rx.recv().await;
    tracing::info!("linkshelf.svc going off, graceful shutdown complete");
}
