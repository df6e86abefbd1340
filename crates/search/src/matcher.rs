//! Pluggable query-vs-entry match strategies.
//!
//! Entries are stored file paths; the strategies differ in which part of the
//! path they inspect and how literally they read the query. All of them are
//! cheap values constructed by the caller and handed to the engine, and all
//! tolerate concurrent calls once constructed.

use std::ffi::OsStr;
use std::path::{Component, Path};
use std::sync::OnceLock;

use regex::Regex;

/// Decides whether `query` matches a single stored `entry`.
///
/// Implementations must be pure: no side effects, and safe to invoke
/// repeatedly and concurrently once constructed. The engine reuses one
/// instance for an entire scan.
pub trait Matcher: Send + Sync {
	fn is_match(&self, query: &str, entry: &str) -> bool;
}

/// Case-insensitive equality of the base names of query and entry.
///
/// Both sides are reduced to their base name first, so a full path works as
/// a query just as well as a bare file name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactName;

impl Matcher for ExactName {
	fn is_match(&self, query: &str, entry: &str) -> bool {
		base_name(query).to_lowercase() == base_name(entry).to_lowercase()
	}
}

/// Case-insensitive substring lookup within the entry's base name.
#[derive(Debug, Default, Clone, Copy)]
pub struct Contains;

impl Matcher for Contains {
	fn is_match(&self, query: &str, entry: &str) -> bool {
		base_name(entry)
			.to_lowercase()
			.contains(&query.to_lowercase())
	}
}

/// Case-sensitive regular-expression search over the whole entry.
///
/// The query is compiled on first use and cached for the lifetime of the
/// instance, so construct one instance per search. A malformed pattern is
/// logged once and the matcher then rejects every entry instead of failing
/// the scan.
#[derive(Debug, Default)]
pub struct RegexMatcher {
	compiled: OnceLock<Option<Regex>>,
}

impl RegexMatcher {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}
}

impl Matcher for RegexMatcher {
	fn is_match(&self, query: &str, entry: &str) -> bool {
		let compiled = self.compiled.get_or_init(|| match Regex::new(query) {
			Ok(pattern) => Some(pattern),
			Err(err) => {
				log::warn!("ignoring unusable search pattern {query:?}: {err}");
				None
			}
		});
		compiled
			.as_ref()
			.is_some_and(|pattern| pattern.is_match(entry))
	}
}

/// Case-insensitive lookup of the query within any directory segment of the
/// entry's parent path. The base name itself is never inspected.
#[derive(Debug, Default, Clone, Copy)]
pub struct AncestorOf;

impl Matcher for AncestorOf {
	fn is_match(&self, query: &str, entry: &str) -> bool {
		let needle = query.to_lowercase();
		directory_of(entry).components().any(|component| {
			let Component::Normal(segment) = component else {
				return false;
			};
			segment
				.to_str()
				.is_some_and(|segment| segment.to_lowercase().contains(&needle))
		})
	}
}

/// Everything after the final separator; empty for paths with no base name.
fn base_name(path: &str) -> &str {
	Path::new(path)
		.file_name()
		.and_then(OsStr::to_str)
		.unwrap_or("")
}

fn directory_of(path: &str) -> &Path {
	Path::new(path).parent().unwrap_or_else(|| Path::new(""))
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::thread;

	use super::*;

	#[test]
	fn exact_name_compares_base_names_case_insensitively() {
		let matcher = ExactName;
		assert!(matcher.is_match("zz.txt", "y/zz.txt"));
		assert!(matcher.is_match("ZZ.TXT", "y/zz.txt"));
		assert!(matcher.is_match("other/dir/zz.txt", "y/zz.txt"));
		assert!(!matcher.is_match("z.txt", "y/zz.txt"));
	}

	#[test]
	fn exact_name_is_symmetric() {
		let matcher = ExactName;
		for (query, entry) in [("a/b.txt", "c/B.TXT"), ("b.txt", "c/other.txt")] {
			assert_eq!(
				matcher.is_match(query, entry),
				matcher.is_match(entry, query)
			);
		}
	}

	#[test]
	fn contains_looks_only_at_the_base_name() {
		let matcher = Contains;
		assert!(matcher.is_match("port", "docs/report.txt"));
		assert!(matcher.is_match("REPORT", "docs/report.txt"));
		assert!(!matcher.is_match("docs", "docs/report.txt"));
	}

	#[test]
	fn regex_matches_any_substring_of_the_entry() {
		let matcher = RegexMatcher::new();
		assert!(matcher.is_match(r".*\.txt", "a/x.txt"));
		assert!(matcher.is_match(r".*\.txt", "b/y/zz.txt"));
		assert!(!matcher.is_match(r".*\.txt", "a/x.rs"));
	}

	#[test]
	fn regex_is_case_sensitive() {
		let matcher = RegexMatcher::new();
		assert!(matcher.is_match("Dropbox", "home/Dropbox/x"));
		let other = RegexMatcher::new();
		assert!(!other.is_match("dropbox", "home/Dropbox/x"));
	}

	#[test]
	fn malformed_pattern_rejects_every_entry() {
		let matcher = RegexMatcher::new();
		assert!(!matcher.is_match("([unclosed", "anything"));
		// Every later call degrades the same way instead of failing.
		assert!(!matcher.is_match("([unclosed", "([unclosed"));
	}

	#[test]
	fn regex_compiles_once_across_concurrent_first_calls() {
		let matcher = Arc::new(RegexMatcher::new());
		let handles: Vec<_> = (0..8)
			.map(|_| {
				let matcher = Arc::clone(&matcher);
				thread::spawn(move || matcher.is_match(r"\d+", "build-42.log"))
			})
			.collect();
		for handle in handles {
			assert!(handle.join().unwrap());
		}
		// The cached pattern from the first call answers later queries too.
		assert!(!matcher.is_match("ignored-new-pattern", "no digits here"));
	}

	#[test]
	fn ancestor_of_matches_directory_segments_case_insensitively() {
		let matcher = AncestorOf;
		assert!(matcher.is_match("dropbox", "/home/me/Dropbox/notes.txt"));
		assert!(matcher.is_match("DROPBOX", "/home/me/Dropbox/notes.txt"));
		assert!(!matcher.is_match("dropbox", "/home/me/svn/notes.txt"));
	}

	#[test]
	fn ancestor_of_never_inspects_the_base_name() {
		let matcher = AncestorOf;
		assert!(!matcher.is_match("notes", "/home/me/svn/notes.txt"));
		assert!(!matcher.is_match("w.txt", "w.txt"));
	}

	#[test]
	fn base_name_splits_like_the_standard_path_utilities() {
		assert_eq!(base_name("a/b/c.txt"), "c.txt");
		assert_eq!(base_name("c.txt"), "c.txt");
		assert_eq!(base_name("/"), "");
	}
}
