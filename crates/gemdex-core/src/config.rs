use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::ai::gemini::{GeminiClient, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::detail::DEFAULT_SEARCH;
use crate::pokeapi::{PokeApiClient, DEFAULT_POKEAPI_BASE_URL};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokeapi_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_species: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("gemdex").join("config.json"))
    }

    /// Directory for the log file.
    pub fn get_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .or_else(dirs::config_dir)
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("gemdex"))
    }

    /// API key from the environment first, then the config file.
    ///
    /// A `.env` file in the working directory is read into the environment beforehand.
    pub fn resolve_api_key(&self) -> Option<String> {
        let _ = dotenvy::dotenv();
        Self::api_key_from(std::env::var(API_KEY_ENV).ok(), self.gemini_api_key.clone())
    }

    fn api_key_from(env: Option<String>, file: Option<String>) -> Option<String> {
        env.filter(|k| !k.trim().is_empty())
            .or(file.filter(|k| !k.trim().is_empty()))
    }

    pub fn gemini_model(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn gemini_base_url(&self) -> &str {
        self.gemini_base_url.as_deref().unwrap_or(DEFAULT_GEMINI_BASE_URL)
    }

    pub fn pokeapi_base_url(&self) -> &str {
        self.pokeapi_base_url.as_deref().unwrap_or(DEFAULT_POKEAPI_BASE_URL)
    }

    pub fn default_species(&self) -> &str {
        self.default_species.as_deref().unwrap_or(DEFAULT_SEARCH)
    }

    /// Gemini client with the resolved credential injected.
    pub fn gemini_client(&self) -> GeminiClient {
        GeminiClient::new(self.resolve_api_key(), self.gemini_model(), self.gemini_base_url())
    }

    pub fn pokeapi_client(&self) -> PokeApiClient {
        PokeApiClient::new(self.pokeapi_base_url())
    }
}
