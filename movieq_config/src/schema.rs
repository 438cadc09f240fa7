use chrono::Datelike;
use movieq_core::YearBounds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable that overrides `providers.omdb.api_key`.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

const CONFIG_TEMPLATE: &str = r#"{
  "providers": {
    "omdb": {
      "api_key": "your-omdb-api-key-here",
      "base_url": "http://www.omdbapi.com/",
      "timeout_secs": 10
    }
  },
  "retry": {
    "base_delays": [1, 2],
    "final_retries": 1,
    "final_delay": 4
  },
  "years": {
    "earliest": 1900
  }
}"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub years: YearsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub omdb: OmdbConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "OmdbConfig::default_base_url")]
    pub base_url: String,
    /// Request timeout (seconds)
    #[serde(default = "OmdbConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl OmdbConfig {
    fn default_base_url() -> String {
        "http://www.omdbapi.com/".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        10
    }
}

/// Backoff schedule for failed catalogue requests.
///
/// Total attempts are `base_delays.len() + final_retries`; there is no wait
/// after the last one.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Waits in seconds after the first failed attempts, in order
    #[serde(default = "RetryConfig::default_base_delays")]
    pub base_delays: Vec<u64>,
    /// Attempts added on top of one per `base_delays` entry
    #[serde(default = "RetryConfig::default_final_retries")]
    pub final_retries: usize,
    /// Wait in seconds once `base_delays` runs out
    #[serde(default = "RetryConfig::default_final_delay")]
    pub final_delay: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delays: Self::default_base_delays(),
            final_retries: Self::default_final_retries(),
            final_delay: Self::default_final_delay(),
        }
    }
}

impl RetryConfig {
    fn default_base_delays() -> Vec<u64> {
        vec![1, 2]
    }

    const fn default_final_retries() -> usize {
        1
    }

    const fn default_final_delay() -> u64 {
        4
    }
}

/// Year window used by "before" and "after" questions.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct YearsConfig {
    #[serde(default = "YearsConfig::default_earliest")]
    pub earliest: i32,
    #[serde(default = "YearsConfig::default_latest")]
    pub latest: i32,
}

impl Default for YearsConfig {
    fn default() -> Self {
        Self {
            earliest: Self::default_earliest(),
            latest: Self::default_latest(),
        }
    }
}

impl YearsConfig {
    const fn default_earliest() -> i32 {
        1900
    }

    fn default_latest() -> i32 {
        chrono::Local::now().year()
    }

    #[must_use]
    pub const fn bounds(&self) -> YearBounds {
        YearBounds::new(self.earliest, self.latest)
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("movieq"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/movieq/config.json`, falling back to defaults when it does
    /// not exist, then apply the `OMDB_API_KEY` override.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            info!("Loading config from {}", config_path.display());
            Self::load_from(&config_path)?
        } else {
            info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Replace the stored API key with `key` unless it is missing or blank.
    #[must_use]
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.providers.omdb.api_key = key;
        }
        self
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Edit the config file and add your OMDb API key");
        println!("      (or export {API_KEY_ENV} instead)");
        println!("   2. Run 'movieq ask' and type a question");
        println!();
        println!("Configuration options:");
        println!("   - retry.base_delays: seconds to wait between failed requests");
        println!("   - years.earliest / years.latest: window for 'before' and 'after' questions");
        println!();
        Ok(())
    }
}
