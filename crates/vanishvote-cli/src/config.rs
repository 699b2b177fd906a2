use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vanishvote_client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use vanishvote_core::{Theme, DEFAULT_REFRESH_INTERVAL};

pub const API_URL_ENV: &str = "VANISHVOTE_API_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_seconds: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_REFRESH_INTERVAL.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub votes_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
    /// Front-end origin for share links. Defaults to the API host.
    pub share_base_url: Option<String>,
}

impl Config {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Environment first, then command-line flags.
    pub fn apply_overrides(
        &mut self,
        env_api_url: Option<String>,
        api_url: Option<String>,
        theme: Option<Theme>,
    ) {
        if let Some(url) = api_url.or(env_api_url).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(theme) = theme {
            self.ui.theme = theme;
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_seconds.max(1)),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_seconds.max(1))
    }

    pub fn votes_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.votes_path {
            return path.clone();
        }
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".vanishvote").join("votes.json")
    }

    pub fn share_base_url(&self) -> String {
        match &self.ui.share_base_url {
            Some(base) => base.clone(),
            None => {
                let api = self.api.base_url.trim_end_matches('/');
                api.strip_suffix("/api").unwrap_or(api).to_string()
            }
        }
    }
}
