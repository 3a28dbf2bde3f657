//! Persistence adapter: typed create/update/delete/list/get over the
//! document store, with asset upload and cleanup against the object store.
//!
//! Ordering rules:
//! - an asset is uploaded before the document that references it is written;
//! - a replaced or orphaned asset is removed only after the document write
//!   succeeded, so no document ever points at a deleted asset;
//! - removing an asset that is already gone is not an error;
//! - a stored asset belongs to the one document it was uploaded for, so a
//!   form may keep its own record's asset but never link to another one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use models::{Content, Document, DocumentId, FieldErrors, Upload, Validated};
use tracing::{debug, info, instrument, warn};

use crate::errors::{ServiceError, StoreError};
use crate::storage::{object_path, DocumentStore, ObjectStore, Query, RawDoc};

#[derive(Clone)]
pub struct ContentRepository {
    docs: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
}

impl ContentRepository {
    pub fn new(docs: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { docs, objects }
    }

    pub fn documents(&self) -> &Arc<dyn DocumentStore> { &self.docs }

    pub fn objects(&self) -> &Arc<dyn ObjectStore> { &self.objects }

    #[instrument(skip_all, fields(kind = %T::KIND))]
    pub async fn create<T: Content>(
        &self,
        record: Validated<T>,
        upload: Option<&Upload>,
    ) -> Result<Document<T>, ServiceError> {
        if upload.is_none() {
            self.check_image_reference(&record, None)?;
        }
        let now = Utc::now();
        let (record, uploaded) = self.attach_upload(record, upload, now).await?;
        let raw = to_raw(record.get(), now, now)?;
        let id = match self.docs.insert(T::KIND.collection(), raw).await {
            Ok(id) => id,
            Err(e) => {
                self.discard_upload(uploaded.as_deref()).await;
                return Err(e.into());
            }
        };
        info!(%id, label = %record.get().label(), "document created");
        Ok(Document { id: DocumentId::new(id), created_at: now, updated_at: now, record: record.into_inner() })
    }

    /// Replace the record stored under `id`. Fields the edit leaves out that
    /// the store owns (current image, moderation state) are carried over.
    #[instrument(skip_all, fields(kind = %T::KIND, id = %id))]
    pub async fn update<T: Content>(
        &self,
        id: &DocumentId,
        record: Validated<T>,
        upload: Option<&Upload>,
    ) -> Result<Document<T>, ServiceError> {
        let existing = self
            .get::<T>(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(T::KIND.collection()))?;
        let now = Utc::now();
        let record = record.carry_over(&existing.record);
        if upload.is_none() {
            self.check_image_reference(&record, existing.record.image_url())?;
        }
        let (record, uploaded) = self.attach_upload(record, upload, now).await?;
        let raw = to_raw(record.get(), existing.created_at, now)?;
        if let Err(e) = self.docs.replace(T::KIND.collection(), id.as_str(), raw).await {
            self.discard_upload(uploaded.as_deref()).await;
            return Err(match e {
                // deleted since it was read
                StoreError::NotFound(_) => ServiceError::not_found(T::KIND.collection()),
                e => e.into(),
            });
        }

        let old_image = existing.record.image_url();
        if old_image.is_some() && old_image != record.get().image_url() {
            self.remove_asset(old_image).await?;
        }
        info!(label = %record.get().label(), "document updated");
        Ok(Document { id: id.clone(), created_at: existing.created_at, updated_at: now, record: record.into_inner() })
    }

    /// Partial update: apply `change` to the stored record, re-check it, and
    /// write back only the fields that differ.
    #[instrument(skip_all, fields(kind = %T::KIND, id = %id))]
    pub async fn modify<T, F>(&self, id: &DocumentId, change: F) -> Result<Document<T>, ServiceError>
    where
        T: Content,
        F: FnOnce(&mut T) -> Result<(), ServiceError> + Send,
    {
        let existing = self
            .get::<T>(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(T::KIND.collection()))?;
        let mut record = existing.record.clone();
        change(&mut record)?;
        let record = Validated::new(record)?;

        let now = Utc::now();
        let before = to_raw(&existing.record, existing.created_at, existing.updated_at)?;
        let after = to_raw(record.get(), existing.created_at, now)?;
        let patch: RawDoc = after
            .into_iter()
            .filter(|(k, v)| before.get(k) != Some(v))
            .collect();
        self.docs.merge(T::KIND.collection(), id.as_str(), patch).await?;
        Ok(Document { id: id.clone(), created_at: existing.created_at, updated_at: now, record: record.into_inner() })
    }

    /// Delete the document, then the asset it referenced. A failure to remove
    /// the asset comes back as [`ServiceError::AssetCleanup`]; the document
    /// is gone by then.
    #[instrument(skip_all, fields(kind = %T::KIND, id = %id))]
    pub async fn delete<T: Content>(&self, id: &DocumentId) -> Result<(), ServiceError> {
        let existing = self
            .get::<T>(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(T::KIND.collection()))?;
        self.docs.delete(T::KIND.collection(), id.as_str()).await?;
        self.remove_asset(existing.record.image_url()).await?;
        info!("document deleted");
        Ok(())
    }

    pub async fn get<T: Content>(&self, id: &DocumentId) -> Result<Option<Document<T>>, ServiceError> {
        let raw = self.docs.get(T::KIND.collection(), id.as_str()).await?;
        raw.map(|doc| from_raw(id.as_str(), doc).map_err(ServiceError::from)).transpose()
    }

    /// Documents that no longer decode as `T` are skipped with a warning.
    pub async fn list<T: Content>(&self, query: &Query) -> Result<Vec<Document<T>>, ServiceError> {
        let rows = self.docs.query(T::KIND.collection(), query).await?;
        let docs = rows
            .into_iter()
            .filter_map(|(id, raw)| match from_raw::<T>(&id, raw) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(kind = %T::KIND, %id, error = %e, "skipping undecodable document");
                    None
                }
            })
            .collect();
        Ok(docs)
    }

    fn check_image_reference<T: Content>(&self, record: &Validated<T>, current: Option<&str>) -> Result<(), ServiceError> {
        match record.get().image_url() {
            Some(url) if self.objects.owns(url) && Some(url) != current => {
                debug!(%url, "form links to a stored asset it does not own");
                let mut errors = FieldErrors::new();
                errors.add("image_url", "Upload the image instead of linking to a stored file.");
                Err(ServiceError::Validation(errors))
            }
            _ => Ok(()),
        }
    }

    async fn attach_upload<T: Content>(
        &self,
        record: Validated<T>,
        upload: Option<&Upload>,
        now: DateTime<Utc>,
    ) -> Result<(Validated<T>, Option<String>), ServiceError> {
        let Some(upload) = upload else { return Ok((record, None)) };
        let path = object_path(T::KIND.collection(), &upload.sanitized_file_name(), now);
        let url = self
            .objects
            .put(&path, upload.bytes.clone(), upload.content_type.as_deref())
            .await?;
        debug!(%url, "asset uploaded");
        Ok((record.with_image_url(url.clone()), Some(url)))
    }

    /// Best effort: the document write failed, so the fresh asset is unreferenced.
    async fn discard_upload(&self, url: Option<&str>) {
        if let Some(url) = url {
            if let Err(e) = self.objects.delete(url).await {
                warn!(%url, error = %e, "could not remove asset after failed write");
            }
        }
    }

    async fn remove_asset(&self, url: Option<&str>) -> Result<(), ServiceError> {
        let Some(url) = url else { return Ok(()) };
        if !self.objects.owns(url) {
            return Ok(());
        }
        match self.objects.delete(url).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound(_)) => {
                debug!(%url, "asset already removed");
                Ok(())
            }
            Err(source) => Err(ServiceError::AssetCleanup { url: url.to_string(), source }),
        }
    }
}

fn to_raw<T: Content>(record: &T, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Result<RawDoc, StoreError> {
    let mut raw = match serde_json::to_value(record)? {
        serde_json::Value::Object(map) => map,
        other => return Err(StoreError::Serialization(format!("expected an object, got {other}"))),
    };
    raw.remove("id");
    raw.insert("created_at".into(), serde_json::to_value(created_at)?);
    raw.insert("updated_at".into(), serde_json::to_value(updated_at)?);
    Ok(raw)
}

fn from_raw<T: Content>(id: &str, mut raw: RawDoc) -> Result<Document<T>, StoreError> {
    raw.insert("id".into(), serde_json::Value::String(id.to_string()));
    Ok(serde_json::from_value(serde_json::Value::Object(raw))?)
}
