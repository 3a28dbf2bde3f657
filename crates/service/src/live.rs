//! Live View Binder: keeps a view's record list in step with a collection.
//!
//! Each bound query runs in its own task that re-reads the full list after
//! every change event and publishes it as a new [`ViewState`] snapshot.
//! Snapshots for one query are delivered serially; independent bindings
//! make no ordering promises relative to each other.

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use models::{Content, Document};

use crate::repository::ContentRepository;
use crate::storage::Query;

/// Full state of a bound view. Every update replaces the record list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState<T> {
    pub records: Vec<Document<T>>,
    pub loading: bool,
    pub error: Option<String>,
    /// `false` once the store reported that it is not configured.
    pub configured: bool,
    pub revision: u64,
}

impl<T> ViewState<T> {
    fn loading() -> Self {
        Self { records: Vec::new(), loading: true, error: None, configured: true, revision: 0 }
    }

    pub fn is_settled(&self) -> bool { !self.loading }
}

#[derive(Clone)]
pub struct LiveBinder {
    repo: ContentRepository,
}

impl LiveBinder {
    pub fn new(repo: ContentRepository) -> Self { Self { repo } }

    /// Start a standing subscription for `query` over `T`'s collection.
    /// Dropping the returned view releases the subscription.
    pub fn bind<T: Content>(&self, query: Query) -> LiveView<T> {
        let (tx, rx) = watch::channel(ViewState::loading());
        // subscribe before the first read so no write falls in between
        let changes = self.repo.documents().watch(T::KIND.collection());
        let task = tokio::spawn(run_binding::<T>(self.repo.clone(), query, changes, tx));
        LiveView { rx, task }
    }
}

async fn run_binding<T: Content>(
    repo: ContentRepository,
    query: Query,
    mut changes: broadcast::Receiver<crate::storage::ChangeEvent>,
    tx: watch::Sender<ViewState<T>>,
) {
    let collection = T::KIND.collection();
    let mut revision = 0u64;
    loop {
        revision += 1;
        let state = match repo.list::<T>(&query).await {
            Ok(records) => ViewState { records, loading: false, error: None, configured: true, revision },
            Err(e) if e.is_not_configured() => {
                debug!(%collection, "store not configured; live view settles empty");
                let _ = tx.send(ViewState { records: Vec::new(), loading: false, error: None, configured: false, revision });
                return;
            }
            Err(e) => {
                error!(%collection, error = %e, "live view read failed");
                ViewState { records: Vec::new(), loading: false, error: Some(e.to_string()), configured: true, revision }
            }
        };
        if tx.send(state).is_err() {
            return;
        }

        tokio::select! {
            _ = tx.closed() => return,
            event = changes.recv() => match event {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return,
            },
        }
        // a burst of writes needs only one re-read
        loop {
            match changes.try_recv() {
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    }
}

/// Consumer side of a binding.
pub struct LiveView<T> {
    rx: watch::Receiver<ViewState<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone> LiveView<T> {
    pub fn snapshot(&self) -> ViewState<T> { self.rx.borrow().clone() }

    /// Wait for the next snapshot. `None` once the binding has ended.
    pub async fn changed(&mut self) -> Option<ViewState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait for the first snapshot that satisfies `pred`.
    pub async fn wait_until<F>(&mut self, pred: F) -> Option<ViewState<T>>
    where
        F: FnMut(&ViewState<T>) -> bool,
    {
        self.rx.wait_for(pred).await.ok().map(|state| state.clone())
    }

    /// Wait until the initial read has finished.
    pub async fn settled(&mut self) -> ViewState<T> {
        match self.wait_until(ViewState::is_settled).await {
            Some(state) => state,
            None => self.snapshot(),
        }
    }

    /// Stop the binding now; dropping the view does the same.
    pub fn unsubscribe(self) { self.task.abort(); }
}

impl<T> Drop for LiveView<T> {
    fn drop(&mut self) { self.task.abort(); }
}
