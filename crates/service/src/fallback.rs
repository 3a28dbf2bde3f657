//! Fallback Supplier: built-in sample content for an empty or unconfigured
//! store. A genuine read error is reported as such, never papered over.
//!
//! Emptiness is judged on the whole collection, not on the filtered result:
//! once a kind has any stored document, a query that matches nothing is
//! answered live and empty.

use serde::Serialize;
use tracing::{debug, error};

use models::{Document, DocumentId};

use crate::errors::ServiceError;
use crate::repository::ContentRepository;
use crate::samples::Samples;
use crate::storage::{Query, RawDoc};

/// `remote` when it has anything in it, otherwise `mock`.
pub fn resolve<T>(remote: Vec<T>, mock: Vec<T>) -> Vec<T> {
    if remote.is_empty() { mock } else { remote }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Live,
    Sample,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub source: Source,
    pub data: T,
}

/// One-shot public reads with sample fallback.
#[derive(Clone)]
pub struct PublicReader {
    repo: ContentRepository,
}

impl PublicReader {
    pub fn new(repo: ContentRepository) -> Self { Self { repo } }

    pub async fn list<T: Samples>(&self, query: &Query) -> Sourced<Vec<Document<T>>> {
        let listed = match self.repo.list::<T>(query).await {
            Ok(remote) if remote.is_empty() => self.collection_is_empty::<T>().await.map(|empty| (remote, empty)),
            Ok(remote) => Ok((remote, false)),
            Err(e) => Err(e),
        };
        match listed {
            Ok((remote, true)) => Sourced { source: Source::Sample, data: resolve(remote, samples_for::<T>(query)) },
            Ok((remote, false)) => Sourced { source: Source::Live, data: remote },
            Err(e) if e.is_not_configured() => {
                debug!(kind = %T::KIND, "store not configured; serving samples");
                Sourced { source: Source::Sample, data: samples_for::<T>(query) }
            }
            Err(e) => {
                error!(kind = %T::KIND, error = %e, "public list read failed");
                Sourced { source: Source::Unavailable, data: Vec::new() }
            }
        }
    }

    async fn collection_is_empty<T: Samples>(&self) -> Result<bool, ServiceError> {
        let any = self.repo.documents().query(T::KIND.collection(), &Query::new().limit(1)).await?;
        Ok(any.is_empty())
    }

    /// A stored document, or the sample with that id when the store has none.
    pub async fn get<T: Samples>(&self, id: &DocumentId) -> Sourced<Option<Document<T>>> {
        let sample = || T::samples().into_iter().find(|doc| &doc.id == id);
        match self.repo.get::<T>(id).await {
            Ok(Some(doc)) => Sourced { source: Source::Live, data: Some(doc) },
            Ok(None) => match sample() {
                Some(doc) => Sourced { source: Source::Sample, data: Some(doc) },
                None => Sourced { source: Source::Live, data: None },
            },
            Err(e) if e.is_not_configured() => Sourced { source: Source::Sample, data: sample() },
            Err(e) => {
                error!(kind = %T::KIND, %id, error = %e, "public read failed");
                Sourced { source: Source::Unavailable, data: None }
            }
        }
    }
}

/// Samples narrowed by the same filters, ordering and limit as live data.
fn samples_for<T: Samples>(query: &Query) -> Vec<Document<T>> {
    query.apply_with(T::samples(), |doc| match serde_json::to_value(doc) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => RawDoc::new(),
    })
}
