use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::thread;

use anyhow::{Context, Result};
use flist_search::{Match, Progress, ScanSummary, SearchEngine, SearchTask};
use flist_store::{Store, ingest_file};

use crate::cli::{MatcherKind, OutputFormat};
use crate::settings::Settings;

/// Parameters of one `search` invocation.
#[derive(Debug)]
pub struct SearchRequest {
	pub query: String,
	pub matcher: MatcherKind,
	pub progress: bool,
	pub limit: Option<usize>,
	pub output: OutputFormat,
}

/// Ingest every source file into the store, one collection per file.
pub fn run_ingest(settings: &Settings, files: &[PathBuf]) -> Result<()> {
	let store = Store::open_or_create(&settings.store_path)
		.with_context(|| format!("cannot open store at {}", settings.store_path.display()))?;
	for file in files {
		let report = ingest_file(&store, file)
			.with_context(|| format!("failed to ingest {}", file.display()))?;
		println!("{}: {} records", report.collection, report.records);
	}
	Ok(())
}

/// Print the stored collection names, one per line.
pub fn run_collections(settings: &Settings) -> Result<()> {
	let store = Store::open_or_create(&settings.store_path)
		.with_context(|| format!("cannot open store at {}", settings.store_path.display()))?;
	for name in store.collection_names()? {
		println!("{name}");
	}
	Ok(())
}

/// Run one streaming search, printing matches as they arrive.
pub fn run_search(settings: &Settings, request: &SearchRequest) -> Result<()> {
	let engine = SearchEngine::new(&settings.store_path);
	let matcher = request.matcher.build();

	let summary = if request.progress {
		let (task, matches, progress) = engine
			.search_with_progress(&request.query, matcher)
			.context("failed to start search")?;
		let reporter = thread::spawn(move || report_progress(&progress));
		let summary = drain_matches(task, &matches, request);
		let _ = reporter.join();
		summary?
	} else {
		let (task, matches) = engine
			.search(&request.query, matcher)
			.context("failed to start search")?;
		drain_matches(task, &matches, request)?
	};

	report_summary(&summary);
	Ok(())
}

/// Print matches until the stream closes or the limit cancels the scan, then
/// wait out the worker.
fn drain_matches(
	task: SearchTask,
	matches: &Receiver<Match>,
	request: &SearchRequest,
) -> Result<ScanSummary> {
	let mut delivered = 0usize;
	for hit in matches.iter() {
		emit_match(&hit, request.output)?;
		delivered += 1;
		if request.limit.is_some_and(|limit| delivered >= limit) {
			task.cancel();
			break;
		}
	}
	task.join().context("search aborted")
}

fn emit_match(hit: &Match, output: OutputFormat) -> Result<()> {
	match output {
		OutputFormat::Plain => println!("{hit}"),
		OutputFormat::Json => println!("{}", serde_json::to_string(hit)?),
	}
	Ok(())
}

fn report_progress(progress: &Receiver<Progress>) {
	let mut reported = false;
	for percent in progress.iter() {
		reported = true;
		eprint!("\r{percent:>3}%");
	}
	if reported {
		eprintln!();
	}
}

fn report_summary(summary: &ScanSummary) {
	let cancelled = if summary.cancelled { " (cancelled)" } else { "" };
	eprintln!(
		"{} matches, {} records across {} collections{cancelled}",
		summary.matches_found, summary.records_scanned, summary.collections_scanned
	);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ingest_then_search_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let source = dir.path().join("drive.txt");
		std::fs::write(&source, "docs/report.txt\nmusic/song.mp3\n").unwrap();

		let settings = Settings {
			store_path: dir.path().join("store"),
		};
		run_ingest(&settings, &[source]).unwrap();

		let engine = SearchEngine::new(&settings.store_path);
		let (task, matches) = engine
			.search("report", MatcherKind::Contains.build())
			.unwrap();
		let hits: Vec<String> = matches.iter().map(|hit| hit.to_string()).collect();
		assert_eq!(hits, ["drive/docs/report.txt"]);
		task.join().unwrap();
	}
}
