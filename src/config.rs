use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use nutrifit_core::NutritionProfile;

/// Cache plan responses for five minutes unless configured otherwise.
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Remote nutrition service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// Base URL (e.g., "https://api.example.com/nutrition")
    pub server_url: Option<String>,
    /// API key for authentication
    pub api_key: Option<String>,
}

impl ServiceConfig {
    /// Returns true if the service is reachable (has both server_url and api_key)
    pub fn is_configured(&self) -> bool {
        self.server_url.is_some() && self.api_key.is_some()
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// How long plan responses may be served from the local cache
    pub cache_ttl_secs: ConfigValue<u64>,
    /// Nutrition targets and preferences captured during onboarding
    pub profile: NutritionProfile,
    /// Remote service settings
    pub service: ServiceConfig,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    cache_ttl_secs: Option<u64>,
    profile: Option<NutritionProfile>,
    service: Option<ServiceConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut cache_ttl_secs = ConfigValue::new(DEFAULT_CACHE_TTL_SECS, ConfigSource::Default);
        let mut profile = NutritionProfile::default();
        let mut service = ServiceConfig::default();
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(ttl) = file_config.cache_ttl_secs {
                cache_ttl_secs = ConfigValue::new(ttl, ConfigSource::File);
            }
            if let Some(file_profile) = file_config.profile {
                profile = file_profile;
            }
            if let Some(service_config) = file_config.service {
                service = service_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(ttl) = std::env::var("NUTRIFIT_CACHE_TTL_SECS") {
            let parsed = ttl
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("NUTRIFIT_CACHE_TTL_SECS", ttl))?;
            cache_ttl_secs = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("NUTRIFIT_SERVER_URL") {
            service.server_url = Some(url);
        }
        if let Ok(key) = std::env::var("NUTRIFIT_API_KEY") {
            service.api_key = Some(key);
        }

        Ok(Self {
            cache_ttl_secs,
            profile,
            service,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/nutrifit/
    /// - macOS: ~/Library/Application Support/nutrifit/
    /// - Windows: %APPDATA%/nutrifit/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nutrifit")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value '{}' for {}", value, name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
