use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::classifier::DEFAULT_CLASSIFIER_URL;
use crate::normalize::Canvas;

const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding [`Config::classifier_url`].
pub const CLASSIFIER_URL_ENV: &str = "TEXIFY_CLASSIFIER_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where committed drawings are POSTed.
    pub classifier_url: String,
    /// Target space drawings are normalized into before encoding.
    pub canvas: Canvas,
    /// Per-request timeout for the HTTP classifier.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier_url: DEFAULT_CLASSIFIER_URL.to_string(),
            canvas: Canvas::default(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from `path`, then apply environment overrides.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str::<Self>(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(CLASSIFIER_URL_ENV) {
            config.classifier_url = url;
        }

        config.canvas.validate().context("Invalid canvas configuration")?;
        Ok(config)
    }

    /// Save the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

/// `config.json` inside the platform config directory.
pub fn default_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "texify")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
