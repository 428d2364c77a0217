use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "upload-normalizer.json";

/// Top-level configuration for the normalizer CLI.
///
/// Only controls how results are emitted. The normalization rules
/// themselves are fixed. Missing keys fall back to their defaults, so a
/// file only needs the settings it changes:
///
/// ```json
/// { "output": { "output_dir": "normalized" } }
/// ```
///
/// # Loading
///
/// ```rust,no_run
/// use upload_normalizer::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("upload-normalizer.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.output.pretty = false;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output behavior (formatting, destination).
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// If `true`, emit indented JSON.
    pub pretty: bool,
    /// If set, write each result under this directory, mirroring the
    /// payload's location, instead of printing it.
    pub output_dir: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            output_dir: None,
        }
    }
}

impl Config {
    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse config file")
    }

    /// Load config.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// in the working directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.is_file() {
                    anyhow::bail!("Config file not found: {}", p.display());
                }
                p
            }
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    log::debug!("No {DEFAULT_CONFIG_FILE} in working directory, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        log::debug!("Loading config from {}", config_path.display());
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::from_json(&contents)
    }

    /// Write config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Output directory, if results go to files.
    pub fn output_dir(&self) -> Option<&Path> {
        self.output.output_dir.as_deref().map(Path::new)
    }
}
