//! Mutation Action: the single write entry point for every content type.
//!
//! `submit` validates, uploads, persists and then hints the page cache, each
//! step gating the next. Failures never escape as errors; callers always get
//! an [`ActionResult`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use models::{Content, ContentKind, DocumentId, FieldErrors, FormInput, ModerationStatus, Testimonial, Validated};

use crate::errors::{ServiceError, StoreError};
use crate::repository::ContentRepository;

/// Coarse classification of an action's result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    Invalid,
    NotFound,
    Conflict,
    NotConfigured,
    Denied,
    /// The write went through but a follow-up step did not.
    Partial,
    #[default]
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Invalid => "invalid",
            Outcome::NotFound => "not_found",
            Outcome::Conflict => "conflict",
            Outcome::NotConfigured => "not_configured",
            Outcome::Denied => "denied",
            Outcome::Partial => "partial",
            Outcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub outcome: Outcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>, id: Option<&DocumentId>) -> Self {
        Self {
            success: true,
            outcome: Outcome::Ok,
            message: message.into(),
            field_errors: None,
            id: id.map(|id| id.to_string()),
        }
    }

    pub fn failed(outcome: Outcome, message: impl Into<String>) -> Self {
        Self { success: false, outcome, message: message.into(), ..Self::default() }
    }

    pub fn partial(message: impl Into<String>) -> Self {
        Self { success: true, outcome: Outcome::Partial, message: message.into(), ..Self::default() }
    }

    pub fn with_id(mut self, id: Option<&DocumentId>) -> Self {
        self.id = id.map(|id| id.to_string());
        self
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            success: false,
            outcome: Outcome::Invalid,
            message: "Please correct the highlighted fields.".to_string(),
            field_errors: Some(errors),
            id: None,
        }
    }
}

/// Receives page paths whose cached output may now be stale.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, page: &str);
}

pub struct NoopInvalidator;

#[async_trait]
impl CacheInvalidator for NoopInvalidator {
    async fn invalidate(&self, _page: &str) {}
}

#[derive(Clone)]
pub struct MutationAction {
    repo: ContentRepository,
    cache: Arc<dyn CacheInvalidator>,
}

impl MutationAction {
    pub fn new(repo: ContentRepository, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self { repo, cache }
    }

    /// Create (no `existing`) or update a record from a form submission.
    pub async fn submit<T: Content>(&self, input: FormInput, existing: Option<&DocumentId>) -> ActionResult {
        let kind = T::KIND;
        let validated = match Validated::<T>::from_input(&input, existing.is_none()) {
            Ok(v) => v,
            Err(errors) => {
                debug!(%kind, fields = %errors, "submission rejected by validation");
                return ActionResult::invalid(errors);
            }
        };
        let saved = match existing {
            None => self.repo.create(validated, input.upload.as_ref()).await,
            Some(id) => self.repo.update(id, validated, input.upload.as_ref()).await,
        };
        match saved {
            Ok(doc) => {
                self.invalidate(kind, Some(&doc.id)).await;
                let verb = if existing.is_some() { "updated" } else { "created" };
                ActionResult::ok(format!("{} {verb}.", kind.singular()), Some(&doc.id))
            }
            Err(e) if e.is_committed() => {
                self.invalidate(kind, existing).await;
                failure(kind, "save", e).with_id(existing)
            }
            Err(e) => failure(kind, "save", e),
        }
    }

    pub async fn delete<T: Content>(&self, id: &DocumentId) -> ActionResult {
        match self.repo.delete::<T>(id).await {
            Ok(()) => {
                self.invalidate(T::KIND, Some(id)).await;
                ActionResult::ok(format!("{} deleted.", T::KIND.singular()), Some(id))
            }
            Err(e) if e.is_committed() => {
                self.invalidate(T::KIND, Some(id)).await;
                failure(T::KIND, "delete", e).with_id(Some(id))
            }
            Err(e) => failure(T::KIND, "delete", e),
        }
    }

    pub async fn set_featured<T: Content>(&self, id: &DocumentId, featured: bool) -> ActionResult {
        if !T::KIND.featurable() {
            return ActionResult::failed(Outcome::Invalid, format!("{} items cannot be featured.", T::KIND.singular()));
        }
        let changed = self
            .repo
            .modify::<T, _>(id, |record| {
                record.set_featured(featured);
                Ok(())
            })
            .await;
        match changed {
            Ok(_) => {
                self.invalidate(T::KIND, Some(id)).await;
                let state = if featured { "featured" } else { "no longer featured" };
                ActionResult::ok(format!("{} is {state}.", T::KIND.singular()), Some(id))
            }
            Err(e) => failure(T::KIND, "feature", e),
        }
    }

    /// Testimonial moderation: only pending -> approved | rejected.
    pub async fn moderate(&self, id: &DocumentId, status: ModerationStatus) -> ActionResult {
        let changed = self
            .repo
            .modify::<Testimonial, _>(id, |t| {
                t.status = t.status.transition(status)?;
                Ok(())
            })
            .await;
        match changed {
            Ok(_) => {
                self.invalidate(ContentKind::Testimonials, Some(id)).await;
                ActionResult::ok(format!("Testimonial {status}."), Some(id))
            }
            Err(e) => failure(ContentKind::Testimonials, "moderate", e),
        }
    }

    async fn invalidate(&self, kind: ContentKind, id: Option<&DocumentId>) {
        for page in kind.dependent_pages(id.map(DocumentId::as_str)) {
            self.cache.invalidate(&page).await;
        }
    }
}

fn failure(kind: ContentKind, op: &'static str, err: ServiceError) -> ActionResult {
    let singular = kind.singular();
    match err {
        ServiceError::Validation(errors) => {
            debug!(%kind, op, fields = %errors, "rejected by validation");
            ActionResult::invalid(errors)
        }
        ServiceError::NotFound(_) => {
            info!(%kind, op, "target document not found");
            ActionResult::failed(Outcome::NotFound, format!("{singular} not found."))
        }
        ServiceError::Model(e) => {
            debug!(%kind, op, error = %e, "rejected by model rules");
            ActionResult::failed(Outcome::Conflict, e.to_string())
        }
        ServiceError::AssetCleanup { url, source } => {
            warn!(%kind, op, %url, error = %source, "write committed but the old asset was left behind");
            ActionResult::partial(format!(
                "The {} change was saved, but its previous image could not be removed.",
                singular.to_lowercase()
            ))
        }
        ServiceError::Store(StoreError::NotConfigured) => {
            debug!(%kind, op, "store not configured");
            ActionResult::failed(Outcome::NotConfigured, "The content store is not configured.")
        }
        ServiceError::Store(StoreError::PermissionDenied(detail)) => {
            error!(%kind, op, %detail, "store denied write");
            warn!(
                target: "diagnostics",
                %kind,
                op,
                %detail,
                "permission denied on write; check the store's access rules for this collection"
            );
            ActionResult::failed(Outcome::Denied, format!("You do not have permission to change this {}.", singular.to_lowercase()))
        }
        ServiceError::Store(e) => {
            error!(%kind, op, error = %e, "store operation failed");
            ActionResult::failed(Outcome::Failed, format!("Could not {op} the {}. Please try again.", singular.to_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Query;
    use crate::storage::{JsonDocumentStore, LocalObjectStore};
    use crate::test_support::{
        demo_project_input, denied_repo, file_backed_repo, png, unconfigured_repo, RecordingInvalidator,
        UndeletableObjects,
    };
    use models::{Event, GalleryImage, Job, Project, RawForm};

    fn action(repo: ContentRepository) -> (MutationAction, Arc<RecordingInvalidator>) {
        let cache = Arc::new(RecordingInvalidator::default());
        (MutationAction::new(repo, cache.clone()), cache)
    }

    #[tokio::test]
    async fn demo_project_is_created_with_one_tag() -> anyhow::Result<()> {
        let (_dir, repo) = file_backed_repo().await?;
        let (action, cache) = action(repo.clone());

        let result = action.submit::<Project>(demo_project_input(), None).await;
        assert!(result.success, "{result:?}");
        let id = DocumentId::new(result.id.clone().expect("id"));
        let stored = repo.get::<Project>(&id).await?.expect("persisted");
        assert_eq!(stored.record.technologies.len(), 1);

        let pages = cache.pages();
        assert!(pages.contains(&"/projects".to_string()));
        assert!(pages.contains(&format!("/projects/{id}")));
        assert!(pages.contains(&"/".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn gallery_image_without_title_names_the_field() -> anyhow::Result<()> {
        let (_dir, repo) = file_backed_repo().await?;
        let (action, cache) = action(repo.clone());
        let input = FormInput::new(RawForm::new().with("title", "").with("category", "team"))
            .with_upload(png("team.png"));

        let result = action.submit::<GalleryImage>(input, None).await;
        assert!(!result.success);
        assert!(result.field_errors.as_ref().is_some_and(|e| e.contains("title")));
        assert!(cache.pages().is_empty());
        assert!(repo.list::<GalleryImage>(&Query::new()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn event_delete_succeeds_when_image_already_gone() -> anyhow::Result<()> {
        let (_dir, repo) = file_backed_repo().await?;
        let (action, _) = action(repo.clone());
        let input = FormInput::new(
            RawForm::new()
                .with("title", "Agents Workshop")
                .with("description", "Hands-on")
                .with("location", "Remote")
                .with("date", "2025-09-01"),
        )
        .with_upload(png("poster.png"));
        let created = action.submit::<Event>(input, None).await;
        assert!(created.success, "{created:?}");
        let id = DocumentId::new(created.id.unwrap());
        let url = repo.get::<Event>(&id).await?.unwrap().record.image_url.unwrap();
        repo.objects().delete(&url).await?;

        let deleted = action.delete::<Event>(&id).await;
        assert!(deleted.success, "{deleted:?}");
        assert!(repo.get::<Event>(&id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn permission_denied_becomes_failure_message() {
        let (action, cache) = action(denied_repo());
        let result = action.submit::<Project>(demo_project_input(), None).await;
        assert!(!result.success);
        assert!(result.message.contains("permission"));
        assert!(cache.pages().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_store_reports_not_configured() {
        let (action, _) = action(unconfigured_repo());
        let result = action.submit::<Project>(demo_project_input(), None).await;
        assert!(!result.success);
        assert!(result.message.contains("not configured"));
    }

    #[tokio::test]
    async fn moderation_cannot_return_to_pending() -> anyhow::Result<()> {
        let (_dir, repo) = file_backed_repo().await?;
        let (action, _) = action(repo.clone());
        let form = RawForm::new()
            .with("author", "Ada")
            .with("company", "Analytical Ltd")
            .with("feedback", "Great work")
            .with("rating", "5")
            .with("status", "approved");
        let created = action.submit::<Testimonial>(FormInput::new(form), None).await;
        let id = DocumentId::new(created.id.unwrap());
        let stored = repo.get::<Testimonial>(&id).await?.unwrap();
        assert_eq!(stored.record.status, ModerationStatus::Pending);

        assert!(action.moderate(&id, ModerationStatus::Approved).await.success);
        let back = action.moderate(&id, ModerationStatus::Pending).await;
        assert!(!back.success);
        assert_eq!(back.outcome, Outcome::Conflict);
        let stored = repo.get::<Testimonial>(&id).await?.unwrap();
        assert_eq!(stored.record.status, ModerationStatus::Approved);
        Ok(())
    }

    #[tokio::test]
    async fn jobs_cannot_be_featured() -> anyhow::Result<()> {
        let (_dir, repo) = file_backed_repo().await?;
        let (action, _) = action(repo);
        let result = action.set_featured::<Job>(&DocumentId::new("any"), true).await;
        assert!(!result.success);
        Ok(())
    }

    #[tokio::test]
    async fn featuring_a_project_invalidates_home() -> anyhow::Result<()> {
        let (_dir, repo) = file_backed_repo().await?;
        let (action, cache) = action(repo.clone());
        let id = DocumentId::new(action.submit::<Project>(demo_project_input(), None).await.id.unwrap());
        cache.clear();

        assert!(action.set_featured::<Project>(&id, true).await.success);
        assert!(repo.get::<Project>(&id).await?.unwrap().record.featured);
        assert!(cache.pages().contains(&"/".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn saved_edit_with_stuck_old_image_still_refreshes_pages() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let docs = JsonDocumentStore::open(dir.path().join("docs")).await?;
        let objects = UndeletableObjects(LocalObjectStore::new(dir.path().join("uploads"), "/uploads"));
        let repo = ContentRepository::new(docs, Arc::new(objects));
        let (action, cache) = action(repo.clone());
        let id = DocumentId::new(action.submit::<Project>(demo_project_input(), None).await.id.unwrap());
        cache.clear();

        let edit = FormInput::new(RawForm::new().with("title", "Renamed").with("description", "Desc").with("technologies", "Go"))
            .with_upload(png("new.png"));
        let result = action.submit::<Project>(edit, Some(&id)).await;
        assert!(result.success, "{result:?}");
        assert_eq!(result.outcome, Outcome::Partial);
        assert_eq!(result.id.as_deref(), Some(id.as_str()));
        assert_eq!(repo.get::<Project>(&id).await?.unwrap().record.title, "Renamed");
        let pages = cache.pages();
        assert!(pages.contains(&"/projects".to_string()));
        assert!(pages.contains(&format!("/projects/{id}")));

        cache.clear();
        let deleted = action.delete::<Project>(&id).await;
        assert_eq!(deleted.outcome, Outcome::Partial);
        assert!(repo.get::<Project>(&id).await?.is_none());
        assert!(cache.pages().contains(&"/projects".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn linking_another_records_image_is_invalid() -> anyhow::Result<()> {
        let (_dir, repo) = file_backed_repo().await?;
        let (action, cache) = action(repo.clone());
        let project = DocumentId::new(action.submit::<Project>(demo_project_input(), None).await.id.unwrap());
        let url = repo.get::<Project>(&project).await?.unwrap().record.image_url.unwrap();
        cache.clear();

        let form = RawForm::new()
            .with("title", "Agents Workshop")
            .with("description", "Hands-on")
            .with("location", "Remote")
            .with("date", "2025-09-01")
            .with("image_url", url.as_str());
        let result = action.submit::<Event>(FormInput::new(form), None).await;
        assert_eq!(result.outcome, Outcome::Invalid);
        assert!(result.field_errors.as_ref().is_some_and(|e| e.contains("image_url")));
        assert!(cache.pages().is_empty());
        assert!(repo.objects().exists(&url).await?);
        Ok(())
    }
}
