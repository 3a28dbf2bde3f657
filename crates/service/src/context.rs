//! Wiring of the stores into the components that use them. Built once at
//! start-up from [`StoreConfig`] and handed to whoever needs store access.

use std::path::PathBuf;
use std::sync::Arc;

use configs::StoreConfig;
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::fallback::PublicReader;
use crate::live::LiveBinder;
use crate::mutation::{CacheInvalidator, MutationAction};
use crate::repository::ContentRepository;
use crate::storage::{
    DocumentStore, JsonDocumentStore, LocalObjectStore, ObjectStore, UnconfiguredObjectStore, UnconfiguredStore,
};

#[derive(Clone)]
pub struct Backend {
    repo: ContentRepository,
    configured: bool,
}

impl Backend {
    /// Open the file-backed stores for the configured project, or the
    /// not-configured stand-ins when no project id is set.
    pub async fn from_config(cfg: &StoreConfig) -> Result<Self, StoreError> {
        let Some(project) = cfg.project_id.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
            warn!("store project id not set; running on sample content");
            return Ok(Self::unconfigured());
        };
        let project = sanitize_project_id(project);
        let data_root = PathBuf::from(&cfg.data_dir).join(&project);
        let docs = JsonDocumentStore::open(&data_root).await?;
        tokio::fs::create_dir_all(&cfg.uploads_dir).await?;
        let objects = LocalObjectStore::new(&cfg.uploads_dir, cfg.public_url.clone());
        info!(%project, data = %data_root.display(), uploads = %cfg.uploads_dir, "store opened");
        Ok(Self::new(docs, Arc::new(objects)))
    }

    pub fn new(docs: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { repo: ContentRepository::new(docs, objects), configured: true }
    }

    pub fn unconfigured() -> Self {
        Self {
            repo: ContentRepository::new(Arc::new(UnconfiguredStore), Arc::new(UnconfiguredObjectStore)),
            configured: false,
        }
    }

    pub fn is_configured(&self) -> bool { self.configured }

    pub fn repository(&self) -> &ContentRepository { &self.repo }

    pub fn binder(&self) -> LiveBinder { LiveBinder::new(self.repo.clone()) }

    pub fn reader(&self) -> PublicReader { PublicReader::new(self.repo.clone()) }

    pub fn actions(&self, cache: Arc<dyn CacheInvalidator>) -> MutationAction {
        MutationAction::new(self.repo.clone(), cache)
    }
}

fn sanitize_project_id(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.trim_matches('_').is_empty() { "default".to_string() } else { cleaned }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_project_id_is_unconfigured() -> anyhow::Result<()> {
        let backend = Backend::from_config(&StoreConfig::default()).await?;
        assert!(!backend.is_configured());
        Ok(())
    }

    #[tokio::test]
    async fn project_data_lives_under_its_own_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = StoreConfig {
            project_id: Some("../acme site".into()),
            data_dir: dir.path().join("data").to_string_lossy().into_owned(),
            uploads_dir: dir.path().join("uploads").to_string_lossy().into_owned(),
            public_url: "/uploads".into(),
        };
        let backend = Backend::from_config(&cfg).await?;
        assert!(backend.is_configured());
        backend.repository().documents().insert("services", Default::default()).await?;
        assert!(dir.path().join("data/___acme_site/services.json").exists());
        assert!(dir.path().join("uploads").is_dir());
        Ok(())
    }
}
