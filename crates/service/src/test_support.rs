#![cfg(test)]
//! Shared fixtures and doubles for the service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;
use tokio::sync::broadcast;

use models::{FormInput, RawForm, Upload};

use crate::ai::{AiError, AiProvider, PromptRequest};
use crate::errors::StoreError;
use crate::mutation::CacheInvalidator;
use crate::repository::ContentRepository;
use crate::storage::{
    ChangeEvent, DocumentStore, JsonDocumentStore, LocalObjectStore, ObjectStore, Query, RawDoc,
    UnconfiguredObjectStore, UnconfiguredStore,
};

/// Repository over a fresh temp directory; keep the `TempDir` alive.
pub async fn file_backed_repo() -> anyhow::Result<(TempDir, ContentRepository)> {
    let dir = tempfile::tempdir()?;
    let docs = JsonDocumentStore::open(dir.path().join("docs")).await?;
    let objects = LocalObjectStore::new(dir.path().join("uploads"), "/uploads");
    Ok((dir, ContentRepository::new(docs, Arc::new(objects))))
}

pub fn unconfigured_repo() -> ContentRepository {
    ContentRepository::new(Arc::new(UnconfiguredStore), Arc::new(UnconfiguredObjectStore))
}

pub fn denied_repo() -> ContentRepository {
    ContentRepository::new(Arc::new(DeniedStore), Arc::new(DeniedStore))
}

pub fn png(name: &str) -> Upload {
    Upload::new(name, Some("image/png".into()), Bytes::from_static(b"\x89PNG\r\n\x1a\nfake"))
}

/// Title "Demo", description "Desc", one technology "Go", plus an image.
pub fn demo_project_input() -> FormInput {
    FormInput::new(RawForm::new().with("title", "Demo").with("description", "Desc").with("technologies", "Go"))
        .with_upload(png("demo.png"))
}

/// Every call is refused as if the store's access rules forbade it.
pub struct DeniedStore;

fn denied() -> StoreError { StoreError::PermissionDenied("missing or insufficient permissions".into()) }

#[async_trait]
impl DocumentStore for DeniedStore {
    async fn insert(&self, _: &str, _: RawDoc) -> Result<String, StoreError> { Err(denied()) }
    async fn replace(&self, _: &str, _: &str, _: RawDoc) -> Result<(), StoreError> { Err(denied()) }
    async fn merge(&self, _: &str, _: &str, _: RawDoc) -> Result<(), StoreError> { Err(denied()) }
    async fn get(&self, _: &str, _: &str) -> Result<Option<RawDoc>, StoreError> { Err(denied()) }
    async fn query(&self, _: &str, _: &Query) -> Result<Vec<(String, RawDoc)>, StoreError> { Err(denied()) }
    async fn delete(&self, _: &str, _: &str) -> Result<(), StoreError> { Err(denied()) }
    fn watch(&self, _: &str) -> broadcast::Receiver<ChangeEvent> { broadcast::channel(1).1 }
}

#[async_trait]
impl ObjectStore for DeniedStore {
    async fn put(&self, _: &str, _: Bytes, _: Option<&str>) -> Result<String, StoreError> { Err(denied()) }
    async fn delete(&self, _: &str) -> Result<(), StoreError> { Err(denied()) }
    async fn exists(&self, _: &str) -> Result<bool, StoreError> { Err(denied()) }
    fn owns(&self, _: &str) -> bool { true }
}

/// Local asset storage whose deletes always fail.
pub struct UndeletableObjects(pub LocalObjectStore);

#[async_trait]
impl ObjectStore for UndeletableObjects {
    async fn put(&self, path: &str, bytes: Bytes, content_type: Option<&str>) -> Result<String, StoreError> {
        self.0.put(path, bytes, content_type).await
    }
    async fn delete(&self, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("asset storage is read-only".into()))
    }
    async fn exists(&self, url: &str) -> Result<bool, StoreError> { self.0.exists(url).await }
    fn owns(&self, url: &str) -> bool { self.0.owns(url) }
}

#[derive(Default)]
pub struct RecordingInvalidator {
    pages: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn pages(&self) -> Vec<String> { self.pages.lock().unwrap().clone() }

    pub fn clear(&self) { self.pages.lock().unwrap().clear(); }
}

#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate(&self, page: &str) { self.pages.lock().unwrap().push(page.to_string()); }
}

/// Returns a fixed reply and remembers the last request.
pub struct MockProvider {
    reply: String,
    last: Mutex<Option<PromptRequest>>,
}

impl MockProvider {
    pub fn replying(reply: &str) -> Self { Self { reply: reply.to_string(), last: Mutex::new(None) } }

    pub fn last_request(&self) -> Option<PromptRequest> { self.last.lock().unwrap().clone() }
}

#[async_trait]
impl AiProvider for MockProvider {
    async fn complete(&self, request: PromptRequest) -> Result<String, AiError> {
        *self.last.lock().unwrap() = Some(request);
        Ok(self.reply.clone())
    }
}
