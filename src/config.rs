//! Client configuration
//!
//! Values are layered: built-in defaults, then an optional `config.json` in the
//! data directory, then environment variables.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Production backend
pub const DEFAULT_API_BASE_URL: &str = "https://stock-ai-backend-irfcgkkf.fly.dev";

pub const ENV_API_BASE_URL: &str = "STOCK_AI_API_BASE_URL";
pub const ENV_API_AUTH: &str = "STOCK_AI_API_AUTH";
pub const ENV_DATA_DIR: &str = "STOCK_AI_DATA_DIR";

const CONFIG_FILE: &str = "config.json";
const APP_DIR_NAME: &str = "stock-ai";

const MARKET_SUMMARY_REFRESH_SECS: u64 = 60;
const STOCK_PRICE_REFRESH_SECS: u64 = 30;

/// Runtime configuration shared by the API client and the views
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, without trailing slash
    pub api_base_url: String,
    /// Static `Authorization` header value sent with every request
    pub api_auth: Option<String>,
    /// Directory holding `config.json` and the session storage
    pub data_dir: PathBuf,
    /// Dashboard market summary auto-refresh period
    pub market_summary_refresh: Duration,
    /// Stock price refresh period
    pub stock_price_refresh: Duration,
}

/// On-disk shape of `config.json`; every field is optional
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_auth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_summary_refresh_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_price_refresh_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_auth: None,
            data_dir: default_data_dir(),
            market_summary_refresh: Duration::from_secs(MARKET_SUMMARY_REFRESH_SECS),
            stock_price_refresh: Duration::from_secs(STOCK_PRICE_REFRESH_SECS),
        }
    }
}

impl Config {
    /// Load configuration from defaults, `config.json` and the environment
    pub fn load() -> Result<Self> {
        let data_dir = std::env::var(ENV_DATA_DIR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let mut config = Self::from_dir(&data_dir)?;

        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }

        if let Ok(auth) = std::env::var(ENV_API_AUTH) {
            config.api_auth = Some(auth).filter(|a| !a.trim().is_empty());
        }

        config.validate()
    }

    /// Defaults overlaid with `<data_dir>/config.json` when present
    pub fn from_dir(data_dir: &Path) -> Result<Self> {
        let mut config = Config {
            data_dir: data_dir.to_path_buf(),
            ..Config::default()
        };

        let path = data_dir.join(CONFIG_FILE);
        if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            let file: ConfigFile = serde_json::from_str(&text).map_err(|e| {
                AppError::Config(format!("Invalid {}: {}", path.display(), e))
            })?;
            config.apply(file);
            tracing::debug!("Loaded configuration from {:?}", path);
        }

        config.validate()
    }

    /// Configuration pointing at an explicit backend, used by tools and tests
    pub fn with_base_url(base_url: &str, data_dir: &Path) -> Result<Self> {
        Config {
            api_base_url: base_url.to_string(),
            data_dir: data_dir.to_path_buf(),
            ..Config::default()
        }
        .validate()
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if file.api_auth.is_some() {
            self.api_auth = file.api_auth;
        }
        if let Some(secs) = file.market_summary_refresh_secs {
            self.market_summary_refresh = Duration::from_secs(secs);
        }
        if let Some(secs) = file.stock_price_refresh_secs {
            self.stock_price_refresh = Duration::from_secs(secs);
        }
    }

    fn validate(mut self) -> Result<Self> {
        let parsed = Url::parse(self.api_base_url.trim()).map_err(|e| {
            AppError::Config(format!("Invalid API base URL '{}': {}", self.api_base_url, e))
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::Config(format!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();

        if self.market_summary_refresh.is_zero() || self.stock_price_refresh.is_zero() {
            return Err(AppError::Config(
                "Refresh intervals must be greater than zero".to_string(),
            ));
        }

        Ok(self)
    }

    /// Directory used by [`crate::storage::LocalStorage`]
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("storage")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
