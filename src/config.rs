use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::prompt::{SummaryFormat, SummaryLength, SummarySettings};
use crate::summarize::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_LANG: &str = "en";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub bind: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub lang: Option<String>,
    pub default_length: Option<u32>,
    pub default_format: Option<SummaryFormat>,
    pub api_key: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytdigest/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// API key from the environment value if given, else from the file. Blank counts as unset.
    pub fn api_key(&self, env_value: Option<String>) -> Option<String> {
        let present = |k: String| Some(k.trim().to_string()).filter(|k| !k.is_empty());
        env_value
            .and_then(present)
            .or_else(|| self.api_key.clone().and_then(present))
    }

    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }

    /// Initial slider and radio values for the form.
    pub fn default_settings(&self) -> SummarySettings {
        SummarySettings {
            length: self.default_length.map(SummaryLength::new).unwrap_or_default(),
            format: self.default_format.unwrap_or_default(),
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytdigest")
        .join("config.toml")
}
