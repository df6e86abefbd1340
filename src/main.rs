//! Command-line entry point for the flist collection search tool.

mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{Command, parse_cli};

fn main() -> Result<()> {
	let cli = parse_cli();
	settings::init_logging(cli.verbose)?;
	let settings = settings::load(&cli)?;

	match cli.command {
		Command::Ingest { files } => workflow::run_ingest(&settings, &files),
		Command::Collections => workflow::run_collections(&settings),
		Command::Search {
			query,
			matcher,
			progress,
			limit,
			output,
		} => workflow::run_search(
			&settings,
			&workflow::SearchRequest {
				query,
				matcher,
				progress,
				limit,
				output,
			},
		),
	}
}
