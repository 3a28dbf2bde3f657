//! Admin content API: list, read, create, update, delete, feature and
//! moderate any collection. Every write goes through the mutation action.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use models::{
    Article, ContentKind, DocumentId, Event, GalleryImage, Inquiry, Job, ModerationStatus, Project, Service,
    Testimonial,
};
use service::{ActionResult, Query, ServiceError};

use crate::errors::JsonApiError;
use crate::forms;
use crate::routes::{action_response, auth::ServerState};

/// Run `$body` with `$t` bound to the record type of `$kind`.
macro_rules! with_kind {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            ContentKind::Services => { type $t = Service; $body }
            ContentKind::Projects => { type $t = Project; $body }
            ContentKind::Articles => { type $t = Article; $body }
            ContentKind::Gallery => { type $t = GalleryImage; $body }
            ContentKind::Events => { type $t = Event; $body }
            ContentKind::Jobs => { type $t = Job; $body }
            ContentKind::Testimonials => { type $t = Testimonial; $body }
            ContentKind::Inquiries => { type $t = Inquiry; $body }
        }
    };
}

fn parse_kind(collection: &str) -> Result<ContentKind, JsonApiError> {
    collection.parse().map_err(|_| JsonApiError::not_found("collection"))
}

fn read_error(e: ServiceError) -> JsonApiError {
    if e.is_not_configured() {
        JsonApiError::unavailable("content store is not configured")
    } else {
        JsonApiError::internal(e.to_string())
    }
}

#[utoipa::path(get, path = "/admin/api/{collection}", tag = "admin", params(("collection" = String, Path, description = "Collection name")), responses((status = 200, description = "Documents, newest first"), (status = 401, description = "Unauthorized"), (status = 503, description = "Store not configured")))]
pub async fn list(State(state): State<ServerState>, Path(collection): Path<String>) -> Result<Json<Value>, JsonApiError> {
    let kind = parse_kind(&collection)?;
    let repo = state.backend.repository();
    let query = Query::newest_first();
    let docs = with_kind!(kind, T => serde_json::to_value(repo.list::<T>(&query).await.map_err(read_error)?)?);
    Ok(Json(docs))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, JsonApiError> {
    let kind = parse_kind(&collection)?;
    let repo = state.backend.repository();
    let id = DocumentId::new(id);
    let doc = with_kind!(kind, T => match repo.get::<T>(&id).await.map_err(read_error)? {
        Some(doc) => serde_json::to_value(doc)?,
        None => return Err(JsonApiError::not_found(kind.singular())),
    });
    Ok(Json(doc))
}

#[utoipa::path(post, path = "/admin/api/{collection}", tag = "admin", params(("collection" = String, Path, description = "Collection name")), responses((status = 200, description = "Created"), (status = 422, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    Path(collection): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ActionResult>), JsonApiError> {
    let kind = parse_kind(&collection)?;
    let input = forms::read_multipart(multipart).await?;
    let result = with_kind!(kind, T => state.actions.submit::<T>(input, None).await);
    Ok(action_response(kind, result))
}

pub async fn update(
    State(state): State<ServerState>,
    Path((collection, id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ActionResult>), JsonApiError> {
    let kind = parse_kind(&collection)?;
    let input = forms::read_multipart(multipart).await?;
    let id = DocumentId::new(id);
    let result = with_kind!(kind, T => state.actions.submit::<T>(input, Some(&id)).await);
    Ok(action_response(kind, result))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<ActionResult>), JsonApiError> {
    let kind = parse_kind(&collection)?;
    let id = DocumentId::new(id);
    let result = with_kind!(kind, T => state.actions.delete::<T>(&id).await);
    Ok(action_response(kind, result))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FeaturedInput {
    pub featured: bool,
}

pub async fn set_featured(
    State(state): State<ServerState>,
    Path((collection, id)): Path<(String, String)>,
    Json(input): Json<FeaturedInput>,
) -> Result<(StatusCode, Json<ActionResult>), JsonApiError> {
    let kind = parse_kind(&collection)?;
    let id = DocumentId::new(id);
    let result = with_kind!(kind, T => state.actions.set_featured::<T>(&id, input.featured).await);
    Ok(action_response(kind, result))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StatusInput {
    pub status: String,
}

/// Only testimonials carry a moderation status.
pub async fn set_status(
    State(state): State<ServerState>,
    Path((collection, id)): Path<(String, String)>,
    Json(input): Json<StatusInput>,
) -> Result<(StatusCode, Json<ActionResult>), JsonApiError> {
    if parse_kind(&collection)? != ContentKind::Testimonials {
        return Err(JsonApiError::bad_request(format!("{collection} have no moderation status")));
    }
    let status: ModerationStatus = input.status.parse().map_err(|e: models::ModelError| {
        debug!(status = %input.status, "unknown moderation status");
        JsonApiError::bad_request(e.to_string())
    })?;
    let result = state.actions.moderate(&DocumentId::new(id), status).await;
    Ok(action_response(ContentKind::Testimonials, result))
}
