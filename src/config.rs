//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.placedash.toml` files.

use crate::cli::{Args, Command, OutputFormat};
use crate::models::Field;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".placedash.toml";

/// Where the effective configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    /// The default file exists but could not be used.
    Ignored(anyhow::Error),
    Defaults,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data file settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Dashboard rendering settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where the placement records live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the CSV data file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data.csv")
}

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Column driving the bar chart.
    #[serde(default = "default_bar_field")]
    pub bar_field: Field,

    /// Column path of the sunburst, outermost first.
    #[serde(default = "default_sunburst_path")]
    pub sunburst_path: Vec<Field>,

    /// Width in cells of the longest bar.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            format: OutputFormat::default(),
            bar_field: default_bar_field(),
            sunburst_path: default_sunburst_path(),
            bar_width: default_bar_width(),
        }
    }
}

fn default_title() -> String {
    "Placement Data Analytics".to_string()
}

fn default_bar_field() -> Field {
    Field::Branch
}

fn default_sunburst_path() -> Vec<Field> {
    vec![Field::EmployerName, Field::Branch, Field::StudentName]
}

fn default_bar_width() -> usize {
    40
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Pick the configuration for a run.
    ///
    /// An explicit path must load. Otherwise `.placedash.toml` in `dir` is
    /// used if present; a broken default file falls back to the defaults and
    /// is reported as [`ConfigSource::Ignored`].
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }

        match Self::load_from_dir(dir) {
            Ok(Some(config)) => Ok((config, ConfigSource::File(dir.join(DEFAULT_CONFIG_FILE)))),
            Ok(None) => Ok((Self::default(), ConfigSource::Defaults)),
            Err(e) => Ok((Self::default(), ConfigSource::Ignored(e))),
        }
    }

    /// Try to load `.placedash.toml` from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.dashboard.bar_width == 0 {
            bail!("dashboard.bar_width must be at least 1");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref data) = args.data {
            self.store.data_file = data.clone();
        }

        let format = match &args.command {
            Some(Command::Show { format, .. }) | Some(Command::Add { format, .. }) => *format,
            _ => None,
        };
        if let Some(format) = format {
            self.dashboard.format = format;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Write a default `.placedash.toml` into `dir`. Never overwrites.
    pub fn write_default(dir: &Path) -> Result<PathBuf> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            bail!(
                "{} already exists. Remove it first or edit it manually.",
                path.display()
            );
        }

        std::fs::write(&path, Self::default_toml())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
