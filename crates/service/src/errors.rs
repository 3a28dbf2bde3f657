use models::{FieldErrors, ModelError};
use thiserror::Error;

/// Failures reported by the document and object stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store is not configured")]
    NotConfigured,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StoreError::PermissionDenied(e.to_string()),
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self { StoreError::Serialization(e.to_string()) }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    /// The document write went through; only removing the asset it no
    /// longer references failed.
    #[error("document written but asset {url} was not removed: {source}")]
    AssetCleanup { url: String, source: StoreError },
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, ServiceError::Store(StoreError::NotConfigured))
    }

    /// Whether the document change is already in the store.
    pub fn is_committed(&self) -> bool { matches!(self, ServiceError::AssetCleanup { .. }) }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ServiceError::Store(StoreError::PermissionDenied(_)))
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self { ServiceError::Validation(errors) }
}
