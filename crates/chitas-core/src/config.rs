use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::state::Language;

pub const DEFAULT_LIBRARY_URL: &str = "https://www.sefaria.org";
pub const DEFAULT_DATE_CONVERTER_URL: &str = "https://www.hebcal.com/converter";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub library_url: Option<String>,
    pub date_converter_url: Option<String>,
    pub language: Option<String>,
    pub dark_theme: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the user's config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn library_url(&self) -> &str {
        self.library_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(DEFAULT_LIBRARY_URL)
    }

    pub fn date_converter_url(&self) -> &str {
        self.date_converter_url
            .as_deref()
            .unwrap_or(DEFAULT_DATE_CONVERTER_URL)
    }

    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .and_then(Language::from_str)
            .unwrap_or_default()
    }

    pub fn dark_theme(&self) -> bool {
        self.dark_theme.unwrap_or(false)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chitas").join("config.json"))
    }
}
