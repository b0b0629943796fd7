use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_max_listings")]
    pub max_listings: usize,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            max_listings: default_max_listings(),
            weights: WeightsConfig::default(),
        }
    }
}

fn default_min_confidence() -> f64 { 70.0 }
fn default_max_listings() -> usize { 500 }

/// Signal weights as written in configuration
///
/// Not validated here; the engine refuses to start on a bad total.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_title_weight")]
    pub title: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_keyword_weight")]
    pub keyword: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            title: default_title_weight(),
            price: default_price_weight(),
            keyword: default_keyword_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            title: config.title,
            price: config.price,
            keyword: config.keyword,
        }
    }
}

fn default_title_weight() -> f64 { 0.6 }
fn default_price_weight() -> f64 { 0.3 }
fn default_keyword_weight() -> f64 { 0.1 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// TOML or JSON catalog file; without it products must be posted inline
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RESALE__)
    /// 5. CATALOG_PATH, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RESALE__MATCHING__MIN_CONFIDENCE -> matching.min_confidence
            .add_source(env_source())
            .build()?;

        apply_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_overrides(settings)?.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.matching.weights)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("RESALE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the un-prefixed CATALOG_PATH variable on top of the layered config
fn apply_overrides(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("CATALOG_PATH") {
        Ok(path) if !path.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("catalog.path", path)?
            .build(),
        _ => Ok(settings),
    }
}
