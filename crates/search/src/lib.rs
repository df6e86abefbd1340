//! Streaming search over flist collections.
//!
//! The engine scans every collection in a store on a dedicated worker thread
//! and streams matches (and, optionally, per-collection progress) back over
//! channels, so a caller observes results as they are found instead of
//! waiting for the full scan. Match semantics are pluggable through the
//! [`Matcher`] strategies, and an in-flight scan can be cancelled
//! cooperatively through its [`CancelToken`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use flist_search::{Contains, SearchEngine};
//!
//! # fn main() -> Result<(), flist_search::SearchError> {
//! let engine = SearchEngine::new("./database");
//! let (task, matches) = engine.search("report", Arc::new(Contains))?;
//! for hit in matches.iter() {
//!     println!("{hit}");
//! }
//! let summary = task.join()?;
//! println!("{} matches", summary.matches_found);
//! # Ok(())
//! # }
//! ```

mod cancel;
mod engine;
mod error;
pub mod matcher;

pub use cancel::CancelToken;
pub use engine::{Match, Progress, ScanSummary, SearchEngine, SearchTask};
pub use error::SearchError;
pub use matcher::{AncestorOf, Contains, ExactName, Matcher, RegexMatcher};
