//! Turning line-delimited source files into stored collections.
//!
//! One source file becomes exactly one collection, named after the file's
//! base name with the extension removed. Each non-empty line becomes one
//! record, inserted in file order.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::IngestError;
use crate::store::Store;

/// Outcome of ingesting a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
	/// Collection the records were appended to.
	pub collection: String,
	/// Number of records inserted.
	pub records: usize,
}

/// Collection name derived from a source path: the base name without its
/// extension. `None` when the path has no usable base name.
#[must_use]
pub fn collection_name_for(source: &Path) -> Option<String> {
	source
		.file_stem()
		.and_then(OsStr::to_str)
		.filter(|stem| !stem.is_empty())
		.map(str::to_owned)
}

/// Ingest one source file into `store`, one record per non-empty line.
///
/// Trailing carriage returns are stripped so CRLF sources ingest cleanly.
/// Re-ingesting the same file appends again; the store does not deduplicate.
///
/// # Errors
///
/// Returns [`IngestError::Source`] when the file cannot be read,
/// [`IngestError::UnnamableSource`] when no collection name can be derived,
/// and [`IngestError::Store`] when the store rejects the append.
pub fn ingest_file(store: &Store, source: &Path) -> Result<IngestReport, IngestError> {
	let name = collection_name_for(source).ok_or_else(|| IngestError::UnnamableSource {
		path: source.to_owned(),
	})?;
	let file = File::open(source).map_err(|io| IngestError::Source {
		path: source.to_owned(),
		source: io,
	})?;

	let collection = store.create_collection(&name)?;
	let mut appender = collection.appender()?;
	let mut records = 0usize;
	for line in BufReader::new(file).lines() {
		let line = line.map_err(|io| IngestError::Source {
			path: source.to_owned(),
			source: io,
		})?;
		let record = line.strip_suffix('\r').unwrap_or(&line);
		if record.is_empty() {
			continue;
		}
		appender.append(record)?;
		records += 1;
	}
	appender.finish()?;

	log::debug!("ingested {records} records into collection {name:?}");
	Ok(IngestReport {
		collection: name,
		records,
	})
}

#[cfg(test)]
mod tests {
	use std::ops::ControlFlow;
	use std::path::PathBuf;

	use super::*;

	fn read_all(store: &Store, name: &str) -> Vec<String> {
		let mut records = Vec::new();
		store
			.open_collection(name)
			.unwrap()
			.for_each_record(|record| {
				records.push(record.to_owned());
				ControlFlow::Continue(())
			})
			.unwrap();
		records
	}

	#[test]
	fn names_collection_after_file_stem() {
		assert_eq!(
			collection_name_for(Path::new("/tmp/backup-2019.txt")).as_deref(),
			Some("backup-2019")
		);
		assert_eq!(
			collection_name_for(Path::new("plain")).as_deref(),
			Some("plain")
		);
		assert_eq!(collection_name_for(Path::new("/")), None);
	}

	#[test]
	fn ingests_non_empty_lines_in_file_order() {
		let dir = tempfile::tempdir().unwrap();
		let source = dir.path().join("drive.txt");
		std::fs::write(&source, "a/x.txt\n\nb/y.txt\n\na/z.txt\n").unwrap();

		let store = Store::open_or_create(dir.path().join("store")).unwrap();
		let report = ingest_file(&store, &source).unwrap();

		assert_eq!(
			report,
			IngestReport {
				collection: "drive".into(),
				records: 3
			}
		);
		assert_eq!(
			read_all(&store, "drive"),
			["a/x.txt", "b/y.txt", "a/z.txt"]
		);
	}

	#[test]
	fn strips_carriage_returns_from_crlf_sources() {
		let dir = tempfile::tempdir().unwrap();
		let source = dir.path().join("win.txt");
		std::fs::write(&source, "c:/users/me\r\nc:/temp\r\n").unwrap();

		let store = Store::open_or_create(dir.path().join("store")).unwrap();
		ingest_file(&store, &source).unwrap();

		assert_eq!(read_all(&store, "win"), ["c:/users/me", "c:/temp"]);
	}

	#[test]
	fn missing_source_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let store = Store::open_or_create(dir.path().join("store")).unwrap();
		let err = ingest_file(&store, &dir.path().join("absent.txt")).unwrap_err();
		assert!(matches!(err, IngestError::Source { .. }));
	}

	#[test]
	fn source_without_base_name_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let store = Store::open_or_create(dir.path().join("store")).unwrap();
		let err = ingest_file(&store, &PathBuf::from("/")).unwrap_err();
		assert!(matches!(err, IngestError::UnnamableSource { .. }));
	}
}
