//! Scan-and-report engine streaming matches out of the collection store.
//!
//! A search opens the store, spawns one worker thread, and hands the caller
//! plain `mpsc` receivers. The worker walks collections in store order,
//! applies the matcher to every record, and emits matches as it finds them;
//! in progress mode it also emits one percentage after each fully-scanned
//! collection. Every exit path — completion, cancellation, a consumer
//! hanging up, a store failure — ends with the senders dropped, so a caller
//! draining a stream always observes closure.

use std::fmt;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use flist_store::Store;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::error::SearchError;
use crate::matcher::Matcher;

/// Percentage of collections fully scanned, in `0..=100`.
pub type Progress = u8;

/// One reportable search hit: a record paired with its collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
	pub collection: String,
	pub record: String,
}

impl fmt::Display for Match {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.collection, self.record)
	}
}

/// Counters describing one finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
	/// Collections scanned to the end.
	pub collections_scanned: usize,
	/// Records tested against the matcher.
	pub records_scanned: usize,
	/// Matches delivered to the consumer.
	pub matches_found: usize,
	/// Whether the scan stopped because the cancel token fired.
	pub cancelled: bool,
}

/// Streaming search over every collection in one store.
///
/// The engine itself is just the store location; each search opens the store
/// for the duration of one scan and releases it when the worker exits.
#[derive(Debug, Clone)]
pub struct SearchEngine {
	store_path: PathBuf,
}

impl SearchEngine {
	#[must_use]
	pub fn new(store_path: impl Into<PathBuf>) -> Self {
		Self {
			store_path: store_path.into(),
		}
	}

	/// Start a scan that emits only matches.
	///
	/// Matches arrive in discovery order: collection enumeration order, then
	/// record order within each collection. The receiver closes once the
	/// scan stops for any reason.
	///
	/// # Errors
	///
	/// Fails with [`SearchError::StoreOpen`] — before any stream is handed
	/// out — when the store cannot be opened or created.
	pub fn search(
		&self,
		query: &str,
		matcher: Arc<dyn Matcher>,
	) -> Result<(SearchTask, Receiver<Match>), SearchError> {
		self.start(query, matcher, None)
	}

	/// Start a scan that also reports progress.
	///
	/// One percentage is emitted after each fully-scanned collection; the
	/// value for a collection is only emitted after all of that collection's
	/// matches. On normal completion the final value is exactly 100 — an
	/// empty store emits a single immediate 100. A cancelled scan closes the
	/// progress stream without a trailing value.
	///
	/// # Errors
	///
	/// Fails with [`SearchError::StoreOpen`] — before any stream is handed
	/// out — when the store cannot be opened or created.
	pub fn search_with_progress(
		&self,
		query: &str,
		matcher: Arc<dyn Matcher>,
	) -> Result<(SearchTask, Receiver<Match>, Receiver<Progress>), SearchError> {
		let (progress_tx, progress_rx) = mpsc::channel();
		let (task, matches) = self.start(query, matcher, Some(progress_tx))?;
		Ok((task, matches, progress_rx))
	}

	fn start(
		&self,
		query: &str,
		matcher: Arc<dyn Matcher>,
		progress_tx: Option<Sender<Progress>>,
	) -> Result<(SearchTask, Receiver<Match>), SearchError> {
		let store = Store::open_or_create(&self.store_path).map_err(SearchError::StoreOpen)?;

		let (match_tx, match_rx) = mpsc::channel();
		let cancel = CancelToken::new();

		let worker_cancel = cancel.clone();
		let query = query.to_owned();
		let worker = thread::spawn(move || {
			scan(
				&store,
				&query,
				matcher.as_ref(),
				&match_tx,
				progress_tx.as_ref(),
				&worker_cancel,
			)
		});

		let task = SearchTask { cancel, worker };
		Ok((task, match_rx))
	}
}

/// Control handle for one in-flight scan.
#[derive(Debug)]
pub struct SearchTask {
	cancel: CancelToken,
	worker: JoinHandle<Result<ScanSummary, SearchError>>,
}

impl SearchTask {
	/// Token that cancels this scan; clone it to signal from elsewhere.
	#[must_use]
	pub fn cancel_token(&self) -> CancelToken {
		self.cancel.clone()
	}

	/// Request cooperative cancellation. Idempotent; the worker stops at its
	/// next record-level check and closes both streams.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Wait for the worker to finish and return its summary.
	///
	/// The streams are unbounded, so joining before draining them cannot
	/// deadlock; undelivered values are simply discarded with the receivers.
	///
	/// # Errors
	///
	/// Returns [`SearchError::Scan`] when the scan aborted on a store
	/// failure, after both streams have closed.
	pub fn join(self) -> Result<ScanSummary, SearchError> {
		match self.worker.join() {
			Ok(result) => result,
			Err(_) => Err(SearchError::WorkerPanicked),
		}
	}
}

fn scan(
	store: &Store,
	query: &str,
	matcher: &dyn Matcher,
	matches: &Sender<Match>,
	progress: Option<&Sender<Progress>>,
	cancel: &CancelToken,
) -> Result<ScanSummary, SearchError> {
	let names = store.collection_names().map_err(SearchError::Scan)?;
	let total = names.len();
	let mut summary = ScanSummary::default();

	for name in names {
		if cancel.is_cancelled() {
			summary.cancelled = true;
			return Ok(summary);
		}

		let collection = store.open_collection(&name).map_err(SearchError::Scan)?;
		let mut hung_up = false;
		collection
			.for_each_record(|record| {
				if cancel.is_cancelled() {
					summary.cancelled = true;
					return ControlFlow::Break(());
				}
				summary.records_scanned += 1;
				if matcher.is_match(query, record) {
					let hit = Match {
						collection: name.clone(),
						record: record.to_owned(),
					};
					if matches.send(hit).is_err() {
						// Nobody is listening any more; stop like a cancel.
						hung_up = true;
						return ControlFlow::Break(());
					}
					summary.matches_found += 1;
				}
				ControlFlow::Continue(())
			})
			.map_err(SearchError::Scan)?;

		if summary.cancelled || hung_up {
			return Ok(summary);
		}

		summary.collections_scanned += 1;
		if let Some(progress) = progress {
			// Progress consumers may legitimately hang up early; the match
			// stream alone decides whether the scan keeps going.
			let _ = progress.send(percent_scanned(summary.collections_scanned, total));
		}
	}

	if total == 0
		&& let Some(progress) = progress
	{
		let _ = progress.send(100);
	}

	Ok(summary)
}

/// Fraction of collections fully scanned, rounded (half up) to a whole
/// percentage. Monotone in `scanned` and exactly 100 when `scanned == total`.
fn percent_scanned(scanned: usize, total: usize) -> Progress {
	if total == 0 {
		return 100;
	}
	let percent = (scanned * 200 + total) / (total * 2);
	Progress::try_from(percent).unwrap_or(100)
}
