//! Content service layer.
//! - Store seams (`storage`) with file-backed and not-configured implementations.
//! - Typed persistence over them (`repository`), live snapshots (`live`),
//!   the write path (`mutation`) and sample fallback for public reads (`fallback`).
//! - AI-assisted flows behind a provider trait (`ai`).

pub mod errors;
pub mod storage;
pub mod repository;
pub mod live;
pub mod mutation;
pub mod fallback;
pub mod samples;
pub mod ai;
pub mod context;
pub mod runtime;
#[cfg(test)]
pub mod test_support;

pub use context::Backend;
pub use errors::{ServiceError, StoreError};
pub use fallback::{resolve, PublicReader, Source, Sourced};
pub use live::{LiveBinder, LiveView, ViewState};
pub use mutation::{ActionResult, CacheInvalidator, MutationAction, NoopInvalidator, Outcome};
pub use repository::ContentRepository;
pub use samples::Samples;
pub use storage::Query;
