use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use crate::error::StoreError;

/// A named, ordered group of records backed by one line-oriented file.
///
/// Collections are append-only; records keep the order they were inserted in.
#[derive(Debug, Clone)]
pub struct Collection {
	name: String,
	path: PathBuf,
}

impl Collection {
	pub(crate) fn new(name: String, path: PathBuf) -> Self {
		Self { name, path }
	}

	/// Name of this collection.
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Visit every record in insertion order until the visitor breaks or the
	/// collection is exhausted.
	///
	/// Records are read lazily; each call restarts from the first record.
	///
	/// # Errors
	///
	/// Returns [`StoreError::CollectionUnavailable`] when the backing file
	/// cannot be opened and [`StoreError::Corrupt`] when a record cannot be
	/// decoded partway through.
	pub fn for_each_record<F>(&self, mut visit: F) -> Result<(), StoreError>
	where
		F: FnMut(&str) -> ControlFlow<()>,
	{
		let file = File::open(&self.path).map_err(|source| StoreError::CollectionUnavailable {
			name: self.name.clone(),
			source,
		})?;
		for line in BufReader::new(file).lines() {
			let record = line.map_err(|source| StoreError::Corrupt {
				name: self.name.clone(),
				source,
			})?;
			if let ControlFlow::Break(()) = visit(&record) {
				break;
			}
		}
		Ok(())
	}

	/// Open the collection for appending a run of records through one handle.
	///
	/// # Errors
	///
	/// Returns [`StoreError::Append`] when the backing file cannot be opened
	/// for writing.
	pub fn appender(&self) -> Result<RecordAppender, StoreError> {
		let file = OpenOptions::new()
			.append(true)
			.create(true)
			.open(&self.path)
			.map_err(|source| StoreError::Append {
				name: self.name.clone(),
				source,
			})?;
		Ok(RecordAppender {
			name: self.name.clone(),
			out: BufWriter::new(file),
		})
	}

	/// Append a single record.
	///
	/// # Errors
	///
	/// Returns [`StoreError::Append`] when the record cannot be written.
	pub fn append_record(&self, record: &str) -> Result<(), StoreError> {
		let mut appender = self.appender()?;
		appender.append(record)?;
		appender.finish()
	}
}

/// Buffered writer appending records to one collection.
///
/// Call [`RecordAppender::finish`] to flush; errors on drop are lost
/// otherwise.
#[derive(Debug)]
pub struct RecordAppender {
	name: String,
	out: BufWriter<File>,
}

impl RecordAppender {
	/// Append one record to the end of the collection.
	///
	/// # Errors
	///
	/// Returns [`StoreError::Append`] when the write fails.
	pub fn append(&mut self, record: &str) -> Result<(), StoreError> {
		writeln!(self.out, "{record}").map_err(|source| StoreError::Append {
			name: self.name.clone(),
			source,
		})
	}

	/// Flush buffered records to disk.
	///
	/// # Errors
	///
	/// Returns [`StoreError::Append`] when the flush fails.
	pub fn finish(mut self) -> Result<(), StoreError> {
		self.out.flush().map_err(|source| StoreError::Append {
			name: self.name.clone(),
			source,
		})
	}
}
