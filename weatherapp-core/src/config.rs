use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    model::{DEFAULT_CITY, LocationQuery},
    query::{DEFAULT_ENDPOINT, QueryBuilder},
};

/// Environment variable that overrides the API key from the config file.
pub const API_KEY_ENV: &str = "WEATHERAPP_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Ottawa"
/// metric_coordinates = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub default_city: String,
    pub endpoint: String,

    /// Send `units=metric` with coordinate queries as well as city queries.
    pub metric_coordinates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: DEFAULT_CITY.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            metric_coordinates: false,
        }
    }
}

impl Config {
    /// Load config from the platform config dir, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from(&Self::config_file_path()?)?;
        cfg.apply_env_key(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        reqwest::Url::parse(&cfg.endpoint)
            .with_context(|| format!("Invalid endpoint '{}' in {}", cfg.endpoint, path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherapp", "weatherapp")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// A non-blank key from the environment wins over the file.
    pub fn apply_env_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weatherapp configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn default_query(&self) -> LocationQuery {
        LocationQuery::city(&self.default_city)
    }

    pub fn query_builder(&self) -> Result<QueryBuilder> {
        Ok(QueryBuilder::new(self.api_key()?)
            .with_endpoint(self.endpoint.clone())
            .with_metric_coordinates(self.metric_coordinates))
    }
}
