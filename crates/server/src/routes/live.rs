//! Live snapshots over Server-Sent Events. Each event carries the full
//! `ViewState` of the collection; closing the stream drops the binding.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, warn};

use models::{
    Article, Content, ContentKind, Event as EventRecord, GalleryImage, Inquiry, Job, Project, Service, Testimonial,
};
use service::{LiveView, Query};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

type SnapshotStream = BoxStream<'static, Result<Event, Infallible>>;

fn snapshots<T: Content>(view: LiveView<T>) -> SnapshotStream {
    stream::unfold((view, true), |(mut view, first)| async move {
        let state = if first { view.settled().await } else { view.changed().await? };
        let event = match Event::default().event("snapshot").json_data(&state) {
            Ok(event) => event,
            Err(e) => {
                warn!(kind = %T::KIND, error = %e, "could not encode snapshot");
                Event::default().event("error").data("snapshot encoding failed")
            }
        };
        Some((Ok(event), (view, false)))
    })
    .boxed()
}

pub async fn stream(
    State(state): State<ServerState>,
    Path(collection): Path<String>,
) -> Result<Sse<SnapshotStream>, JsonApiError> {
    let kind: ContentKind = collection.parse().map_err(|_| JsonApiError::not_found("collection"))?;
    let binder = state.backend.binder();
    let query = Query::newest_first();
    debug!(%kind, "live stream opened");
    let events = match kind {
        ContentKind::Services => snapshots(binder.bind::<Service>(query)),
        ContentKind::Projects => snapshots(binder.bind::<Project>(query)),
        ContentKind::Articles => snapshots(binder.bind::<Article>(query)),
        ContentKind::Gallery => snapshots(binder.bind::<GalleryImage>(query)),
        ContentKind::Events => snapshots(binder.bind::<EventRecord>(query)),
        ContentKind::Jobs => snapshots(binder.bind::<Job>(query)),
        ContentKind::Testimonials => snapshots(binder.bind::<Testimonial>(query)),
        ContentKind::Inquiries => snapshots(binder.bind::<Inquiry>(query)),
    };
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
