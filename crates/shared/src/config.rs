use std::env;

use crate::error::ConfigError;

pub const CONGRESS_API_KEY: &str = "CONGRESS_API_KEY";
pub const CONGRESS_API_BASE_URL: &str = "CONGRESS_API_BASE_URL";
pub const HUGGINGFACE_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const HUGGINGFACE_MODEL_URL: &str = "HUGGINGFACE_MODEL_URL";

pub const DEFAULT_CONGRESS_BASE_URL: &str = "https://api.congress.gov/v3";
pub const DEFAULT_HUGGINGFACE_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// Settings for the Congress.gov API, used by the bill and text fetchers.
#[derive(Debug, Clone)]
pub struct CongressConfig {
    pub api_key: String,
    pub base_url: String,
}

impl CongressConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        try_load_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, CONGRESS_API_KEY)?;
        let base_url = lookup(CONGRESS_API_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONGRESS_BASE_URL.to_string());

        Ok(Self::new(api_key, base_url))
    }
}

/// Settings for the Hugging Face inference endpoint used by the summarizer.
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_key: String,
    pub model_url: String,
}

impl HuggingFaceConfig {
    pub fn new(api_key: impl Into<String>, model_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_url: model_url.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        try_load_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, HUGGINGFACE_API_KEY)?;
        let model_url = lookup(HUGGINGFACE_MODEL_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HUGGINGFACE_MODEL_URL.to_string());

        Ok(Self::new(api_key, model_url))
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar { name })
}

fn try_load_dotenv() {
    // Try locations in order of preference:

    // 1. Current directory (for development)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // 2. ~/.config/bill-tracker/.env (standard config location)
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("bill-tracker").join(".env");
        if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
            return;
        }
    }

    // 3. ~/.env (home directory)
    if let Some(home_dir) = dirs::home_dir() {
        let home_path = home_dir.join(".env");
        if home_path.exists() {
            let _ = dotenvy::from_path(&home_path);
        }
    }

    // If none found, that's okay - environment variables might be set system-wide
}
