use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::model::MealType;

/// Settings for the extraction pipeline
#[derive(Debug, Deserialize, Clone)]
pub struct ExtractorConfig {
    /// Overall fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of redirects followed before giving up
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Category used when no meal keyword matches
    #[serde(default)]
    pub default_meal_type: MealType,
    /// Images declaring a width or height below this (in pixels) are treated as icons
    #[serde(default = "default_min_image_size")]
    pub min_image_size: u32,
    /// Memoize fetched pages for this many seconds (disabled when absent)
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
    /// Most pages kept by the page cache; the least recently used is evicted first
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            default_meal_type: MealType::default(),
            min_image_size: default_min_image_size(),
            cache_ttl_secs: None,
            cache_capacity: default_cache_capacity(),
        }
    }
}

// Default value functions
fn default_timeout_secs() -> u64 {
    20
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_min_image_size() -> u32 {
    100
}

fn default_cache_capacity() -> usize {
    256
}

impl ExtractorConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_EXTRACT__ prefix
    /// 2. recipe_extract.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_EXTRACT__TIMEOUT_SECS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}

/// Load configuration from file and environment variables
///
/// See [`ExtractorConfig::load`] for the lookup order.
pub fn load_config() -> Result<ExtractorConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_extract").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_EXTRACT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
