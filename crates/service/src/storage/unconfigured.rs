use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::broadcast;

use crate::errors::StoreError;
use crate::storage::document::{ChangeEvent, DocumentStore, RawDoc};
use crate::storage::object::ObjectStore;
use crate::storage::query::Query;

/// Stand-in used when no store project is configured. Every call reports
/// `NotConfigured`, which callers treat as an expected state.
pub struct UnconfiguredStore;

#[async_trait]
impl DocumentStore for UnconfiguredStore {
    async fn insert(&self, _: &str, _: RawDoc) -> Result<String, StoreError> { Err(StoreError::NotConfigured) }
    async fn replace(&self, _: &str, _: &str, _: RawDoc) -> Result<(), StoreError> { Err(StoreError::NotConfigured) }
    async fn merge(&self, _: &str, _: &str, _: RawDoc) -> Result<(), StoreError> { Err(StoreError::NotConfigured) }
    async fn get(&self, _: &str, _: &str) -> Result<Option<RawDoc>, StoreError> { Err(StoreError::NotConfigured) }
    async fn query(&self, _: &str, _: &Query) -> Result<Vec<(String, RawDoc)>, StoreError> { Err(StoreError::NotConfigured) }
    async fn delete(&self, _: &str, _: &str) -> Result<(), StoreError> { Err(StoreError::NotConfigured) }

    /// Already closed: there will never be changes.
    fn watch(&self, _: &str) -> broadcast::Receiver<ChangeEvent> {
        let (_tx, rx) = broadcast::channel(1);
        rx
    }
}

pub struct UnconfiguredObjectStore;

#[async_trait]
impl ObjectStore for UnconfiguredObjectStore {
    async fn put(&self, _: &str, _: Bytes, _: Option<&str>) -> Result<String, StoreError> { Err(StoreError::NotConfigured) }
    async fn delete(&self, _: &str) -> Result<(), StoreError> { Err(StoreError::NotConfigured) }
    async fn exists(&self, _: &str) -> Result<bool, StoreError> { Err(StoreError::NotConfigured) }
    fn owns(&self, _: &str) -> bool { false }
}
