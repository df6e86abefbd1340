use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, File};
use directories::ProjectDirs;
use serde::Deserialize;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use crate::cli::CliArgs;

/// On-disk configuration, everything optional. CLI arguments win over the
/// config file, which wins over the platform defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
	store: StoreSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct StoreSection {
	path: Option<PathBuf>,
}

/// Effective configuration after merging all sources.
#[derive(Debug, Clone)]
pub struct Settings {
	pub store_path: PathBuf,
}

/// Merge the default config file, an explicit `--config` file, and CLI
/// overrides into the effective settings.
pub fn load(cli: &CliArgs) -> Result<Settings> {
	let mut builder = Config::builder();
	if let Some(path) = default_config_file() {
		builder = builder.add_source(File::from(path).required(false));
	}
	if let Some(path) = &cli.config {
		builder = builder.add_source(File::from(path.clone()));
	}
	let raw: RawSettings = builder
		.build()
		.context("failed to load configuration")?
		.try_deserialize()
		.context("failed to parse configuration")?;

	let store_path = cli
		.store
		.clone()
		.or(raw.store.path)
		.unwrap_or_else(default_store_dir);
	log::debug!("using collection store at {}", store_path.display());

	Ok(Settings { store_path })
}

/// Route `log` output to stderr at a level controlled by `-v` flags.
pub fn init_logging(verbosity: u8) -> Result<()> {
	let level = match verbosity {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		_ => LevelFilter::Debug,
	};
	TermLogger::init(
		level,
		simplelog::Config::default(),
		TerminalMode::Stderr,
		ColorChoice::Auto,
	)
	.context("failed to initialise logging")
}

fn project_dirs() -> Option<ProjectDirs> {
	ProjectDirs::from("", "", "flist")
}

fn default_config_file() -> Option<PathBuf> {
	project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

fn default_store_dir() -> PathBuf {
	project_dirs().map_or_else(
		|| PathBuf::from("./flist-store"),
		|dirs| dirs.data_dir().join("store"),
	)
}
