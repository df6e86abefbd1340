use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the collection store.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The store root exists but cannot be used, or could not be created.
	#[error("store path {path:?} is not usable as a collection store")]
	Unavailable {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	/// The requested collection does not exist or cannot be opened.
	#[error("collection {name:?} is unavailable")]
	CollectionUnavailable {
		name: String,
		#[source]
		source: io::Error,
	},
	/// The collection name would escape the store directory.
	#[error("invalid collection name {name:?}")]
	InvalidName { name: String },
	/// Reading records back from disk failed partway through.
	#[error("collection {name:?} is corrupt")]
	Corrupt {
		name: String,
		#[source]
		source: io::Error,
	},
	/// Appending a record failed.
	#[error("failed to append to collection {name:?}")]
	Append {
		name: String,
		#[source]
		source: io::Error,
	},
}

/// Failures while turning a source file into a collection.
#[derive(Debug, Error)]
pub enum IngestError {
	/// The source file could not be read.
	#[error("cannot read source file {path:?}")]
	Source {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	/// The source path has no usable base name to derive a collection name from.
	#[error("source path {path:?} has no base name")]
	UnnamableSource { path: PathBuf },
	/// Writing into the store failed.
	#[error(transparent)]
	Store(#[from] StoreError),
}
