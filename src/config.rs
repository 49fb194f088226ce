//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\census-geocoder\config.toml
//! - macOS: ~/Library/Application Support/census-geocoder/config.toml
//! - Linux: ~/.config/census-geocoder/config.toml
//!
//! Lookup defaults can also be set per process with environment variables,
//! which win over the file:
//! - `CENSUS_GEOCODER_BENCHMARK`
//! - `CENSUS_GEOCODER_VINTAGE`
//! - `CENSUS_GEOCODER_LAYERS`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::geocoder::transport::RetryPolicy;

/// Environment variable overriding the default benchmark
pub const BENCHMARK_ENV: &str = "CENSUS_GEOCODER_BENCHMARK";
/// Environment variable overriding the default vintage
pub const VINTAGE_ENV: &str = "CENSUS_GEOCODER_VINTAGE";
/// Environment variable overriding the default layers
pub const LAYERS_ENV: &str = "CENSUS_GEOCODER_LAYERS";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Benchmark, vintage and layers used when a lookup names none
    pub defaults: LookupDefaults,

    /// Where and how to reach the service
    pub service: ServiceConfig,
}

/// Default lookup parameters, as short codes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupDefaults {
    /// Benchmark short code, e.g. "CURRENT"
    pub benchmark: String,

    /// Vintage short code, e.g. "CENSUS2020"
    pub vintage: String,

    /// Comma-separated geography categories, or "all"
    pub layers: String,
}

impl Default for LookupDefaults {
    fn default() -> Self {
        Self {
            benchmark: "CURRENT".to_string(),
            vintage: "CURRENT".to_string(),
            layers: "all".to_string(),
        }
    }
}

/// Service endpoint and retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service root, without the `/geocoder` path
    pub base_url: String,

    /// Attempts per request, including the first
    pub max_tries: u32,

    /// Longest wait between two attempts, in seconds
    pub max_delay_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://geocoding.geo.census.gov".to_string(),
            max_tries: 5,
            max_delay_secs: 10,
        }
    }
}

impl ServiceConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_tries, Duration::from_secs(self.max_delay_secs))
    }
}

impl Config {
    /// Apply environment overrides through `lookup`.
    ///
    /// Unset and empty variables leave the current value alone.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields = [
            (BENCHMARK_ENV, &mut self.defaults.benchmark),
            (VINTAGE_ENV, &mut self.defaults.vintage),
            (LAYERS_ENV, &mut self.defaults.layers),
        ];
        for (name, field) in fields {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                tracing::debug!("{} overrides configured value {:?}", name, field);
                *field = value.trim().to_string();
            }
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("census-geocoder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk and the process environment
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let mut config = load_file();
    config.apply_overrides(|name| std::env::var(name).ok());
    config
}

fn load_file() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    load_from(&path)
}

/// Load configuration from a specific file, falling back to defaults
pub fn load_from(path: &std::path::Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir)
}

/// Save configuration as `config.toml` inside `dir`
pub fn save_to(config: &Config, dir: &std::path::Path) -> Result<PathBuf, ConfigError> {
    let path = dir.join("config.toml");

    // Ensure directory exists
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[defaults]"));
        assert!(toml.contains("[service]"));
        assert!(toml.contains("benchmark = \"CURRENT\""));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.defaults.benchmark, "CURRENT");
        assert_eq!(config.defaults.vintage, "CURRENT");
        assert_eq!(config.defaults.layers, "all");
        assert_eq!(config.service.base_url, "https://geocoding.geo.census.gov");
        assert_eq!(config.service.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[defaults]
vintage = "CENSUS2020"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // Specified field is set
        assert_eq!(config.defaults.vintage, "CENSUS2020");

        // Other fields use defaults
        assert_eq!(config.defaults.benchmark, "CURRENT");
        assert_eq!(config.service.max_tries, 5);
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            (BENCHMARK_ENV, "census2020"),
            (VINTAGE_ENV, " CENSUS2010 "),
            (LAYERS_ENV, ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.defaults.benchmark, "census2020");
        assert_eq!(config.defaults.vintage, "CENSUS2010");
        // Empty values are ignored
        assert_eq!(config.defaults.layers, "all");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.defaults.layers = "States, Counties".to_string();
        config.service.max_tries = 2;

        let path = save_to(&config, dir.path()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_unparseable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [not toml").unwrap();
        assert_eq!(load_from(&path), Config::default());
    }
}
