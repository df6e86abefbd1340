use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::collection::Collection;
use crate::error::StoreError;

/// Extension carried by every collection file inside the store directory.
const COLLECTION_EXT: &str = "list";

/// Handle to a store directory holding named collections.
///
/// Opening a store only validates the directory; collection files are opened
/// lazily, one operation at a time. Dropping the store is the (idempotent)
/// release.
#[derive(Debug, Clone)]
pub struct Store {
	root: PathBuf,
}

impl Store {
	/// Open the store at `root`, creating the directory if it is absent.
	///
	/// # Errors
	///
	/// Returns [`StoreError::Unavailable`] when `root` exists but is not a
	/// directory, or when the directory cannot be created.
	pub fn open_or_create(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let root = root.into();
		match fs::metadata(&root) {
			Ok(metadata) if metadata.is_dir() => {}
			Ok(_) => {
				return Err(StoreError::Unavailable {
					path: root,
					source: io::Error::other("store path is not a directory"),
				});
			}
			Err(_) => {
				fs::create_dir_all(&root).map_err(|source| StoreError::Unavailable {
					path: root.clone(),
					source,
				})?;
				log::debug!("created collection store at {}", root.display());
			}
		}
		Ok(Self { root })
	}

	/// Directory backing this store.
	#[must_use]
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Names of every collection currently present.
	///
	/// The names are sorted; that ordering is a property of the store, not of
	/// insertion time, and callers should attach no meaning to it beyond
	/// determinism.
	///
	/// # Errors
	///
	/// Returns [`StoreError::Unavailable`] when the store directory cannot be
	/// listed.
	pub fn collection_names(&self) -> Result<Vec<String>, StoreError> {
		let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Unavailable {
			path: self.root.clone(),
			source,
		})?;

		let mut names = Vec::new();
		for entry in entries {
			let entry = entry.map_err(|source| StoreError::Unavailable {
				path: self.root.clone(),
				source,
			})?;
			let path = entry.path();
			if path.extension().and_then(OsStr::to_str) != Some(COLLECTION_EXT) {
				continue;
			}
			if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
				names.push(stem.to_owned());
			}
		}
		names.sort_unstable();
		Ok(names)
	}

	/// Open an existing collection for reading.
	///
	/// # Errors
	///
	/// Returns [`StoreError::CollectionUnavailable`] when the collection is
	/// missing or not a regular file, and [`StoreError::InvalidName`] for
	/// names that would escape the store directory.
	pub fn open_collection(&self, name: &str) -> Result<Collection, StoreError> {
		let path = self.collection_path(name)?;
		match fs::metadata(&path) {
			Ok(metadata) if metadata.is_file() => Ok(Collection::new(name.to_owned(), path)),
			Ok(_) => Err(StoreError::CollectionUnavailable {
				name: name.to_owned(),
				source: io::Error::other("collection is not a regular file"),
			}),
			Err(source) => Err(StoreError::CollectionUnavailable {
				name: name.to_owned(),
				source,
			}),
		}
	}

	/// Open a collection for appending, creating its backing file if needed.
	///
	/// # Errors
	///
	/// Returns [`StoreError::InvalidName`] for unusable names and
	/// [`StoreError::CollectionUnavailable`] when the file cannot be created.
	pub fn create_collection(&self, name: &str) -> Result<Collection, StoreError> {
		let path = self.collection_path(name)?;
		fs::OpenOptions::new()
			.append(true)
			.create(true)
			.open(&path)
			.map_err(|source| StoreError::CollectionUnavailable {
				name: name.to_owned(),
				source,
			})?;
		Ok(Collection::new(name.to_owned(), path))
	}

	fn collection_path(&self, name: &str) -> Result<PathBuf, StoreError> {
		if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
			return Err(StoreError::InvalidName {
				name: name.to_owned(),
			});
		}
		Ok(self.root.join(format!("{name}.{COLLECTION_EXT}")))
	}
}
