//! Persisted collection store for ingested file lists.
//!
//! A store is a directory of named collections. Each collection is one
//! append-only, line-oriented file holding a single record per line, created
//! the first time a source file is ingested. Readers see records in insertion
//! order; nothing here ever rewrites a collection.
//!
//! No descriptors stay open between operations, so a [`Store`] can be dropped
//! at any point to release it.

mod collection;
mod error;
mod ingest;
mod store;

pub use collection::{Collection, RecordAppender};
pub use error::{IngestError, StoreError};
pub use ingest::{IngestReport, collection_name_for, ingest_file};
pub use store::Store;
