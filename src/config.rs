use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

use crate::error::{Result, TurmiteError};
use crate::grid::Grid;
use crate::heading::Heading;
use crate::palette::MAX_PALETTE_SIZE;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub ant: AntConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PaletteConfig {
    #[serde(default = "default_palette_size")]
    pub size: usize,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AntConfig {
    #[serde(default = "default_heading")]
    pub heading: Heading,
    /// Start column; grid center when absent
    #[serde(default)]
    pub x: Option<i32>,
    /// Start row; grid center when absent
    #[serde(default)]
    pub y: Option<i32>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Host-side iteration cap; unbounded when absent
    #[serde(default)]
    pub max_iterations: Option<u64>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_image_path")]
    pub image_path: String,
    /// JSON run summary; an empty path disables it
    #[serde(default = "default_summary_path")]
    pub summary_path: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// tracing filter directive, overridden by RUST_LOG
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Debug progress event every N iterations, 0 disables
    #[serde(default)]
    pub progress_interval: u64,
}

// Default values
fn default_width() -> i32 { 512 }
fn default_height() -> i32 { 512 }
fn default_palette_size() -> usize { 256 }
fn default_heading() -> Heading { Heading::Left }
fn default_image_path() -> String { "langtonsant.png".to_string() }
fn default_summary_path() -> String { "langtonsant.json".to_string() }
fn default_filter() -> String { "info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            size: default_palette_size(),
        }
    }
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            heading: default_heading(),
            x: None,
            y: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_path: default_image_path(),
            summary_path: default_summary_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            progress_interval: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            palette: PaletteConfig::default(),
            ant: AntConfig::default(),
            run: RunConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// No file at the path; every value is a default
    Defaults,
}

impl ConfigSource {
    /// Emit the load outcome; call after the subscriber is installed
    pub fn log(self, path: &Path) {
        match self {
            ConfigSource::File => info!(path = %path.display(), "Loaded configuration"),
            ConfigSource::Defaults => {
                info!(path = %path.display(), "No configuration file found, using defaults")
            }
        }
    }
}

impl OutputConfig {
    pub fn summary_path(&self) -> Option<&Path> {
        if self.summary_path.is_empty() {
            None
        } else {
            Some(Path::new(&self.summary_path))
        }
    }
}

impl Config {
    /// Load configuration from `path`, or use defaults if the file doesn't exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    /// Nothing is logged here; callers report the source once logging is up.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource)> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok((Self::parse(&contents)?, ConfigSource::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok((Config::default(), ConfigSource::Defaults))
            }
            Err(e) => Err(TurmiteError::Config(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parse and validate TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| TurmiteError::Config(format!("failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<()> {
        Grid::check_size(self.grid.width, self.grid.height)?;
        if !(2..=MAX_PALETTE_SIZE).contains(&self.palette.size) {
            return Err(TurmiteError::InvalidPaletteSize {
                size: self.palette.size,
            });
        }
        let (x, y) = self.start_position();
        if x < 0 || x >= self.grid.width || y < 0 || y >= self.grid.height {
            return Err(TurmiteError::StartOutOfBounds { x, y });
        }
        Ok(())
    }

    /// Start position, defaulting each axis to the grid center
    pub fn start_position(&self) -> (i32, i32) {
        (
            self.ant.x.unwrap_or(self.grid.width / 2),
            self.ant.y.unwrap_or(self.grid.height / 2),
        )
    }
}
