use flist_store::StoreError;
use thiserror::Error;

/// Failures that abort a search.
///
/// Per-record conditions never appear here: an unreadable pattern or a query
/// that matches nothing simply yields no matches.
#[derive(Debug, Error)]
pub enum SearchError {
	/// The collection store could not be opened. Surfaced before any stream
	/// is handed to the caller.
	#[error("collection store could not be opened")]
	StoreOpen(#[source] StoreError),
	/// The scan hit an unreadable collection and stopped early. Both streams
	/// are closed before this is returned from [`SearchTask::join`].
	///
	/// [`SearchTask::join`]: crate::SearchTask::join
	#[error("collection scan aborted")]
	Scan(#[source] StoreError),
	/// The scan worker terminated abnormally.
	#[error("search worker panicked")]
	WorkerPanicked,
}
