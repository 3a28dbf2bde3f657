use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::storage::json_map_store::JsonMapStore;
use crate::storage::query::Query;

/// Schema-less document body: field name to JSON value.
pub type RawDoc = serde_json::Map<String, serde_json::Value>;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// Published after every successful write to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub collection: String,
    pub id: String,
    pub change: ChangeKind,
}

/// A per-collection document database with change notifications.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document and return the identifier assigned to it.
    async fn insert(&self, collection: &str, doc: RawDoc) -> Result<String, StoreError>;
    /// Replace the whole document stored under `id`. `NotFound` when the
    /// document is absent; a replace never brings a deleted document back.
    async fn replace(&self, collection: &str, id: &str, doc: RawDoc) -> Result<(), StoreError>;
    /// Overwrite only the given fields. `NotFound` when the document is absent.
    async fn merge(&self, collection: &str, id: &str, fields: RawDoc) -> Result<(), StoreError>;
    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDoc>, StoreError>;
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<(String, RawDoc)>, StoreError>;
    /// `NotFound` when the document is absent.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
    /// Change feed for one collection. Subscribe before reading to avoid
    /// missing writes that land in between.
    fn watch(&self, collection: &str) -> broadcast::Receiver<ChangeEvent>;
}

/// File-backed document store: `{root}/{collection}.json` per collection.
pub struct JsonDocumentStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, Arc<JsonMapStore<String, RawDoc>>>>,
    channels: DashMap<String, broadcast::Sender<ChangeEvent>>,
}

impl JsonDocumentStore {
    pub async fn open<P: Into<PathBuf>>(root: P) -> Result<Arc<Self>, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Arc::new(Self {
            root,
            collections: RwLock::new(HashMap::new()),
            channels: DashMap::new(),
        }))
    }

    async fn collection(&self, name: &str) -> Result<Arc<JsonMapStore<String, RawDoc>>, StoreError> {
        validate_collection_name(name)?;
        if let Some(store) = self.collections.read().await.get(name) {
            return Ok(Arc::clone(store));
        }
        let mut collections = self.collections.write().await;
        if let Some(store) = collections.get(name) {
            return Ok(Arc::clone(store));
        }
        let store = JsonMapStore::new(self.root.join(format!("{name}.json"))).await?;
        collections.insert(name.to_string(), Arc::clone(&store));
        debug!(collection = %name, "opened collection");
        Ok(store)
    }

    /// Open change-feed subscriptions on `collection`.
    pub fn watchers(&self, collection: &str) -> usize {
        self.channels.get(collection).map_or(0, |tx| tx.receiver_count())
    }

    fn publish(&self, collection: &str, id: &str, change: ChangeKind) {
        if let Some(tx) = self.channels.get(collection) {
            // no receivers is fine
            let _ = tx.send(ChangeEvent { collection: collection.to_string(), id: id.to_string(), change });
        }
    }
}

fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    let ok = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StoreError::PermissionDenied(format!("invalid collection name '{name}'")))
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    async fn insert(&self, collection: &str, doc: RawDoc) -> Result<String, StoreError> {
        let store = self.collection(collection).await?;
        let id = Uuid::new_v4().simple().to_string();
        store.insert(id.clone(), doc).await?;
        self.publish(collection, &id, ChangeKind::Added);
        Ok(id)
    }

    async fn replace(&self, collection: &str, id: &str, doc: RawDoc) -> Result<(), StoreError> {
        let store = self.collection(collection).await?;
        store
            .update_map(|map| match map.get_mut(id) {
                Some(current) => {
                    *current = doc;
                    Ok(())
                }
                None => Err(StoreError::NotFound(format!("{collection}/{id}"))),
            })
            .await?;
        self.publish(collection, id, ChangeKind::Modified);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, fields: RawDoc) -> Result<(), StoreError> {
        let store = self.collection(collection).await?;
        store
            .update_map(|map| {
                let doc = map
                    .get_mut(id)
                    .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
                doc.extend(fields);
                Ok(())
            })
            .await?;
        self.publish(collection, id, ChangeKind::Modified);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDoc>, StoreError> {
        let store = self.collection(collection).await?;
        Ok(store.get(&id.to_string()).await)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<(String, RawDoc)>, StoreError> {
        let store = self.collection(collection).await?;
        Ok(query.apply(store.list().await))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let store = self.collection(collection).await?;
        if !store.remove(&id.to_string()).await? {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }
        self.publish(collection, id, ChangeKind::Removed);
        Ok(())
    }

    fn watch(&self, collection: &str) -> broadcast::Receiver<ChangeEvent> {
        self.channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}
