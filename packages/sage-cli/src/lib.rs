use std::path::{Path, PathBuf};

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Logs to stderr so JSON written to stdout stays parseable.
///
/// A subscriber already installed in the process is kept, so `run` may be called repeatedly.
pub fn init_tracing(config: &sage_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
}

/// CLI flag first, then `knowledge_base.path` resolved against the config file's directory.
pub fn resolve_knowledge_base_path(
	flag: Option<&Path>,
	config: &sage_config::Config,
	config_path: &Path,
) -> color_eyre::Result<PathBuf> {
	if let Some(path) = flag {
		return Ok(path.to_path_buf());
	}

	let Some(path) = config.knowledge_base.path.as_deref() else {
		return Err(eyre::eyre!(
			"No knowledge base given; pass --knowledge-base or set knowledge_base.path."
		));
	};
	let path = Path::new(path);

	if path.is_absolute() {
		return Ok(path.to_path_buf());
	}

	Ok(config_path.parent().map(|dir| dir.join(path)).unwrap_or_else(|| path.to_path_buf()))
}
