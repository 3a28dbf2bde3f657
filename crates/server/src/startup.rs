use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::{runtime, Backend};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState, UploadMount};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Build the application for an already-loaded configuration.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_env(cfg).await?;
    let backend = Backend::from_config(&cfg.store).await?;
    if !cfg.ai.is_configured() {
        warn!("AI provider not configured; AI endpoints will report unavailable");
    }
    let state = ServerState::new(backend, cfg)?;
    let uploads = UploadMount { public_url: &cfg.store.public_url, dir: &cfg.store.uploads_dir };
    Ok(routes::build_router(state, build_cors(), &cfg.server.frontend_dir, uploads))
}

/// Serve `cfg` until SIGINT or SIGTERM, then let in-flight requests finish.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, store_configured = cfg.store.is_configured(), "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("drained in-flight requests");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut term), Ok(mut int)) => {
                let name = tokio::select! {
                    _ = term.recv() => "SIGTERM",
                    _ = int.recv() => "SIGINT",
                };
                info!(signal = name, "shutdown requested");
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "signal handlers unavailable; falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!(signal = "ctrl_c", "shutdown requested");
    }
}
