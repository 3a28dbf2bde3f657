//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so the binary prepares the store
//! directories without knowing the store layout.

use configs::AppConfig;

/// Ensure the data and upload directories exist; warn when the frontend
/// bundle is missing.
pub async fn ensure_env(cfg: &AppConfig) -> anyhow::Result<()> {
    let dirs = [cfg.store.data_dir.as_str(), cfg.store.uploads_dir.as_str()];
    common::env::ensure_env(&cfg.server.frontend_dir, &dirs).await
}
