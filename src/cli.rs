use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use flist_search::{AncestorOf, Contains, ExactName, Matcher, RegexMatcher};

/// Command-line arguments accepted by the `flist` binary.
#[derive(Parser, Debug)]
#[command(
	name = "flist",
	version,
	about = "Ingest line-delimited file lists and stream searches across them"
)]
pub struct CliArgs {
	#[arg(
		long,
		value_name = "DIR",
		env = "FLIST_STORE",
		global = true,
		help = "Override the collection store directory"
	)]
	pub store: Option<PathBuf>,
	#[arg(
		short = 'c',
		long = "config",
		value_name = "FILE",
		env = "FLIST_CONFIG",
		global = true,
		help = "Additional configuration file to merge"
	)]
	pub config: Option<PathBuf>,
	#[arg(
		short,
		long,
		action = ArgAction::Count,
		global = true,
		help = "Increase log verbosity (-v info, -vv debug)"
	)]
	pub verbose: u8,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Ingest line-delimited path lists, one collection per source file.
	Ingest {
		#[arg(required = true, value_name = "FILE")]
		files: Vec<PathBuf>,
	},
	/// List the stored collections.
	Collections,
	/// Scan every collection for entries matching the query.
	Search {
		#[arg(value_name = "QUERY")]
		query: String,
		#[arg(
			short,
			long,
			value_enum,
			default_value_t = MatcherKind::Contains,
			help = "Match strategy applied to each entry"
		)]
		matcher: MatcherKind,
		#[arg(short, long, help = "Report per-collection progress on stderr")]
		progress: bool,
		#[arg(
			short = 'l',
			long,
			value_name = "N",
			help = "Cancel the scan after N matches"
		)]
		limit: Option<usize>,
		#[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
		output: OutputFormat,
	},
}

/// Match strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatcherKind {
	/// Base name equals the query's base name (case-insensitive).
	Exact,
	/// Base name contains the query (case-insensitive).
	Contains,
	/// Entry matches the query as a regular expression (case-sensitive).
	Regex,
	/// A parent directory segment contains the query (case-insensitive).
	Ancestor,
}

impl MatcherKind {
	/// Construct a fresh matcher instance for one search.
	#[must_use]
	pub fn build(self) -> Arc<dyn Matcher> {
		match self {
			Self::Exact => Arc::new(ExactName),
			Self::Contains => Arc::new(Contains),
			Self::Regex => Arc::new(RegexMatcher::new()),
			Self::Ancestor => Arc::new(AncestorOf),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// One `collection/record` line per match.
	Plain,
	/// One JSON object per match.
	Json,
}

pub fn parse_cli() -> CliArgs {
	CliArgs::parse()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verify_cli_definition() {
		use clap::CommandFactory;
		CliArgs::command().debug_assert();
	}

	#[test]
	fn search_defaults_to_contains_plain() {
		let cli = CliArgs::parse_from(["flist", "search", "report"]);
		match cli.command {
			Command::Search {
				matcher, output, ..
			} => {
				assert_eq!(matcher, MatcherKind::Contains);
				assert_eq!(output, OutputFormat::Plain);
			}
			other => panic!("unexpected command {other:?}"),
		}
	}
}
