use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::StoreError;

/// Binary asset storage addressed by path, handing out public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path` and return its public URL.
    async fn put(&self, path: &str, bytes: Bytes, content_type: Option<&str>) -> Result<String, StoreError>;
    /// `NotFound` when nothing is stored behind `url`.
    async fn delete(&self, url: &str) -> Result<(), StoreError>;
    async fn exists(&self, url: &str) -> Result<bool, StoreError>;
    /// Whether `url` points into this store. Foreign URLs are never deleted.
    fn owns(&self, url: &str) -> bool;
}

/// `{collection}/{unix_millis}-{file_name}`
pub fn object_path(collection: &str, file_name: &str, now: DateTime<Utc>) -> String {
    format!("{collection}/{}-{file_name}", now.timestamp_millis())
}

/// Stores assets on the local filesystem; the HTTP server mounts `root`
/// under `public_url`.
pub struct LocalObjectStore {
    root: PathBuf,
    public_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        let public_url = public_url.into().trim_end_matches('/').to_string();
        Self { root: root.into(), public_url }
    }

    pub fn root(&self) -> &Path { &self.root }

    fn relative_path<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(&self.public_url)?.strip_prefix('/')
    }

    /// Resolve an object path below `root`, refusing anything that would
    /// escape it.
    fn resolve(&self, relative: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(relative);
        let safe = !relative.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StoreError::PermissionDenied(format!("invalid object path '{relative}'")));
        }
        Ok(self.root.join(rel))
    }

    fn path_for_url(&self, url: &str) -> Result<PathBuf, StoreError> {
        let relative = self
            .relative_path(url)
            .ok_or_else(|| StoreError::NotFound(format!("object {url} is not in this store")))?;
        self.resolve(relative)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, path: &str, bytes: Bytes, content_type: Option<&str>) -> Result<String, StoreError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;
        debug!(%path, size = bytes.len(), content_type = content_type.unwrap_or("unknown"), "stored object");
        Ok(format!("{}/{}", self.public_url, path))
    }

    async fn delete(&self, url: &str) -> Result<(), StoreError> {
        let target = self.path_for_url(url)?;
        tokio::fs::remove_file(&target).await?;
        debug!(%url, "deleted object");
        Ok(())
    }

    async fn exists(&self, url: &str) -> Result<bool, StoreError> {
        let target = match self.path_for_url(url) {
            Ok(p) => p,
            Err(StoreError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(tokio::fs::try_exists(&target).await?)
    }

    fn owns(&self, url: &str) -> bool { self.relative_path(url).is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_paths_are_timestamped() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(object_path("projects", "shot.png", now), "projects/1714564800000-shot.png");
    }

    #[tokio::test]
    async fn put_delete_and_missing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = LocalObjectStore::new(dir.path(), "/uploads/");
        let url = store.put("gallery/1-a.png", Bytes::from_static(b"png"), Some("image/png")).await?;
        assert_eq!(url, "/uploads/gallery/1-a.png");
        assert!(store.owns(&url));
        assert!(store.exists(&url).await?);

        store.delete(&url).await?;
        assert!(!store.exists(&url).await?);
        assert!(matches!(store.delete(&url).await, Err(StoreError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn foreign_and_traversal_urls() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = LocalObjectStore::new(dir.path(), "/uploads");
        assert!(!store.owns("https://cdn.example.com/a.png"));
        assert!(!store.exists("https://cdn.example.com/a.png").await?);
        assert!(matches!(
            store.delete("/uploads/../secrets.txt").await,
            Err(StoreError::PermissionDenied(_))
        ));
        assert!(store.put("../escape.png", Bytes::from_static(b"x"), None).await.is_err());
        Ok(())
    }
}
