use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for letter discovery and storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Listing root (page 1 of the paginated index)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Origin used to resolve relative links found on listing pages
    #[serde(default = "default_site_origin")]
    pub site_origin: String,

    /// Path segment every letter locator contains
    #[serde(default = "default_topic_marker")]
    pub topic_marker: String,

    /// Minimum title length in characters
    #[serde(default = "default_min_title_len")]
    pub min_title_len: usize,

    /// Link texts that never count as a letter title (case-insensitive)
    #[serde(default = "default_boilerplate_titles")]
    pub boilerplate_titles: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first failed attempt of a request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Listing pages probed by one "fetch more" run
    #[serde(default = "default_fetch_more_attempts")]
    pub fetch_more_attempts: u32,

    /// Where the JSON letter store lives
    #[serde(default = "default_store_path")]
    pub store_path: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://www.frbsf.org/research-and-insights/publications/economic-letter/".to_string()
}

fn default_site_origin() -> String {
    "https://www.frbsf.org".to_string()
}

fn default_topic_marker() -> String {
    "economic-letter".to_string()
}

fn default_min_title_len() -> usize {
    10
}

fn default_boilerplate_titles() -> Vec<String> {
    vec![
        "read the economic letter".to_string(),
        "economic letter".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_fetch_more_attempts() -> u32 {
    5
}

fn default_store_path() -> String {
    "./data/letters.json".to_string()
}

fn default_user_agent() -> String {
    concat!("letter-scout/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            site_origin: default_site_origin(),
            topic_marker: default_topic_marker(),
            min_title_len: default_min_title_len(),
            boilerplate_titles: default_boilerplate_titles(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            fetch_more_attempts: default_fetch_more_attempts(),
            store_path: default_store_path(),
            user_agent: default_user_agent(),
        }
    }
}

impl ScoutConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override fields from `LETTERS_BASE_URL` and `LETTERS_STORE_PATH` when set
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("LETTERS_BASE_URL") {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(store_path) = std::env::var("LETTERS_STORE_PATH") {
            if !store_path.is_empty() {
                self.store_path = store_path;
            }
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
