use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.todoist.com/rest/v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub api_token: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub allow_insecure_certs: bool,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    15
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// `DUELINE_CONFIG` overrides the platform config location.
    pub fn get_path() -> Result<PathBuf> {
        if let Ok(path) = env::var("DUELINE_CONFIG")
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }
        let proj = ProjectDirs::from("com", "dueline", "dueline")
            .context("Could not determine config directory")?;
        Ok(proj.config_dir().join("config.toml"))
    }

    pub fn get_path_string() -> Result<String> {
        Ok(Self::get_path()?.to_string_lossy().to_string())
    }

    pub fn load() -> Result<Self> {
        let path = Self::get_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Config file not found at {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid config file")?;
        if config.api_token.trim().is_empty() {
            anyhow::bail!("api_token must not be empty");
        }
        Ok(config)
    }

    /// Directory holding the task store and the log file.
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(crate::storage::LocalStorage::default_data_dir)
    }
}
