//! Spectrum reputation engine (spectrum-rep) - Main entry point
//!
//! Loads configuration, warm-starts the score table, then serves the event
//! ingestion API until Ctrl+C / SIGTERM. On shutdown a final snapshot is
//! written and the persistence queue is drained.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use spectrum_common::config::TomlConfig;
use spectrum_rep::config::Config;
use spectrum_rep::directory::MemberDirectory;
use spectrum_rep::snapshot::SnapshotScheduler;
use spectrum_rep::{build_router, open_backend, AppState, Backend};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for spectrum-rep
#[derive(Parser, Debug)]
#[command(name = "spectrum-rep")]
#[command(about = "Reaction-driven reputation engine")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SPECTRUM_PORT")]
    port: Option<u16>,

    /// Root folder holding the database and snapshots
    #[arg(short, long, env = "SPECTRUM_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Config file (defaults to the platform config location)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml = TomlConfig::load_or_default(args.config.as_deref());
    let config = Config::resolve(args.root_folder.as_deref(), args.port, toml);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("spectrum_rep={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting spectrum-rep v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Root folder: {}", config.root_folder.display());

    // Without it the bot-content guard cannot fire, so reaction routes answer 503
    if config.reputation.bot_id.is_none() {
        warn!("reputation.bot_id not configured; reaction events will be refused");
    }

    let Backend {
        store,
        pool,
        persist_worker,
    } = open_backend(&config.db_path, &config.snapshot_path, config.persist_timeout()).await;

    let cancel = CancellationToken::new();
    let scheduler = SnapshotScheduler::new(
        store.clone(),
        config.snapshot_path.clone(),
        config.snapshot_interval(),
    );
    let snapshot_task = scheduler.spawn(cancel.clone());

    let state = AppState::new(store.clone(), Arc::new(MemberDirectory::new()), &config.reputation);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    info!("spectrum-rep listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Final snapshot, then let the persistence queue drain
    cancel.cancel();
    if let Err(e) = snapshot_task.await {
        warn!("Snapshot task ended abnormally: {}", e);
    }
    let final_sweep = SnapshotScheduler::new(
        store.clone(),
        config.snapshot_path.clone(),
        config.snapshot_interval(),
    );
    match final_sweep.sweep().await {
        Ok(count) => info!("Final snapshot written ({} identities)", count),
        Err(e) => warn!("Could not write final snapshot: {}", e),
    }
    drop(final_sweep);
    drop(store);

    if let Some(worker) = persist_worker {
        match worker.await {
            Ok(stats) => info!(
                "Persistence drained ({} written, {} failed)",
                stats.written, stats.failed
            ),
            Err(e) => warn!("Persistence worker ended abnormally: {}", e),
        }
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
