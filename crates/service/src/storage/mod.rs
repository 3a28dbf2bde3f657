//! Storage seams for the service layer.
//!
//! `DocumentStore` and `ObjectStore` are the traits the rest of the crate
//! talks to. The file-backed implementations keep one JSON file per
//! collection and plain files for uploaded assets; the unconfigured
//! implementations stand in when no store project is set.

pub mod json_map_store;
pub mod query;
pub mod document;
pub mod object;
pub mod unconfigured;

pub use document::{ChangeEvent, ChangeKind, DocumentStore, JsonDocumentStore, RawDoc};
pub use object::{object_path, LocalObjectStore, ObjectStore};
pub use query::{Direction, OrderBy, Query};
pub use unconfigured::{UnconfiguredObjectStore, UnconfiguredStore};
