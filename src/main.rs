use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use turmite::config::{Config, DEFAULT_CONFIG_PATH};
use turmite::runner;

fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    // Logging needs the configured filter, so read the config before tracing is up
    let (config, source) = Config::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    init_tracing(&config.logging.filter);
    source.log(&config_path);

    let summary = runner::run(&config, Path::new(".")).context("turmite run failed")?;

    tracing::info!(iterations = summary.iterations(), "Done");
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
