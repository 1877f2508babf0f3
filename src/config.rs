use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one or many extraction calls.
///
/// Passed explicitly to [`read_metadata`](crate::pipeline::read_metadata);
/// nothing in the library reads global settings.
///
/// # Loading
///
/// ```rust,no_run
/// use exif_meta::config::{Config, Granularity};
///
/// // From a JSON file
/// let config = Config::load(Some("exif-meta.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.write_empty_values = true;
/// config.granularity = Granularity::Day;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keep empty and whitespace-only values instead of dropping them.
    pub write_empty_values: bool,
    /// Precision of the EXIF date fields.
    pub granularity: Granularity,
    /// Where raw tags come from.
    pub extraction: ExtractionStrategy,
    /// exiftool binary used by [`ExtractionStrategy::ExifTool`].
    pub exiftool_location: String,
}

/// Date precision for `datetime`, `datetimeoriginal` and `datetimedigitized`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Keep the time of day.
    #[default]
    Default,
    /// Truncate the time of day to `00:00:00`.
    Day,
}

/// How raw tags are read from the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// In-process EXIF and IPTC parsing.
    #[default]
    Native,
    /// Run the exiftool binary and parse its JSON dump.
    #[serde(alias = "simple_exiftool")]
    ExifTool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            write_empty_values: false,
            granularity: Granularity::Default,
            extraction: ExtractionStrategy::Native,
            exiftool_location: "exiftool".to_string(),
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("exif-meta.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
