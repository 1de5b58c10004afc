//! Random Game Unit - serves one random poll, quiz or picture game fragment
//!
//! Candidate sets are cached for a configurable TTL in front of the store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use random_game_unit::api::create_router;
use random_game_unit::units::{CandidateStore, MemoryCandidateStore};
use random_game_unit::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the game unit server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the candidate store seed, if any
/// 4. Wire cache, picker and renderer
/// 5. Start background TTL cleanup task
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "random_game_unit=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Random Game Unit server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: display={:?}, unit_count={}, candidate_ttl={}s, max_entries={}, port={}",
        config.display, config.unit_count, config.candidate_ttl, config.max_entries, config.server_port
    );

    let store: Arc<dyn CandidateStore> = match &config.seed_path {
        Some(path) => Arc::new(
            MemoryCandidateStore::from_json_file(path)
                .await
                .with_context(|| format!("loading candidate seed from {}", path.display()))?,
        ),
        None => {
            warn!("SEED_PATH not set; candidate store is empty");
            Arc::new(MemoryCandidateStore::default())
        }
    };

    let state = AppState::from_config(&config, store).context("wiring game unit picker")?;
    info!("Game unit picker initialized");

    let cleanup_handle = spawn_cleanup_task(state.cache.clone(), config.cleanup_interval);
    info!("Background cleanup task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
