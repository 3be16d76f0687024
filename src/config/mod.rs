//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/smartloc/config.toml

pub mod defaults;

use crate::constants::geo::{INITIAL_LAT, INITIAL_LNG};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Teleport lifecycle timing
    #[serde(default)]
    pub teleport: TeleportConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Initial location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Map link settings
    #[serde(default)]
    pub url: UrlConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Gemini model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum candidates per search (1-3)
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Teleport lifecycle timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeleportConfig {
    /// Simulated engine latency in milliseconds
    #[serde(default = "default_commit_delay")]
    pub commit_delay_ms: u64,

    /// Success status display time in milliseconds
    #[serde(default = "default_status_display")]
    pub status_display_ms: u64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Initial location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Target app preset
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Initial latitude (GCJ-02)
    #[serde(default = "default_initial_lat")]
    pub initial_lat: f64,

    /// Initial longitude (GCJ-02)
    #[serde(default = "default_initial_lng")]
    pub initial_lng: f64,
}

/// Map link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Gemini API key (GEMINI_API_KEY / API_KEY env vars take priority)
    #[serde(default)]
    pub gemini: String,
}

// Default value functions for serde
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_commit_delay() -> u64 {
    DEFAULT_COMMIT_DELAY_MS
}
fn default_status_display() -> u64 {
    DEFAULT_STATUS_DISPLAY_MS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_initial_lat() -> f64 {
    INITIAL_LAT
}
fn default_initial_lng() -> f64 {
    INITIAL_LNG
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "amap".to_string(),
        "https://uri.amap.com/marker?position={lng},{lat}&name={name}&coordinate=gaode".to_string(),
    );
    providers.insert(
        "amap_web".to_string(),
        "https://www.amap.com/?q={lat},{lng},{name}".to_string(),
    );
    providers
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            max_results: default_max_results(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: default_commit_delay(),
            status_display_ms: default_status_display(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            initial_lat: default_initial_lat(),
            initial_lng: default_initial_lng(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "model"] => Some(self.search.model.clone()),
            ["search", "base_url"] => Some(self.search.base_url.clone()),
            ["search", "max_results"] => Some(self.search.max_results.to_string()),
            ["search", "timeout_secs"] => Some(self.search.timeout_secs.to_string()),

            ["teleport", "commit_delay_ms"] => Some(self.teleport.commit_delay_ms.to_string()),
            ["teleport", "status_display_ms"] => Some(self.teleport.status_display_ms.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["location", "default_preset"] => Some(self.location.default_preset.clone()),
            ["location", "initial_lat"] => Some(self.location.initial_lat.to_string()),
            ["location", "initial_lng"] => Some(self.location.initial_lng.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            ["api_keys", "gemini"] => Some(self.api_keys.gemini.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "model"] => {
                self.search.model = value.to_string();
            }
            ["search", "base_url"] => {
                self.search.base_url = value.to_string();
            }
            ["search", "max_results"] => {
                let max: usize = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid max_results value: {}", value))
                })?;
                if !(1..=DEFAULT_MAX_RESULTS).contains(&max) {
                    return Err(Error::Config(format!(
                        "max_results must be between 1 and {}",
                        DEFAULT_MAX_RESULTS
                    )));
                }
                self.search.max_results = max;
            }
            ["search", "timeout_secs"] => {
                self.search.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            ["teleport", "commit_delay_ms"] => {
                self.teleport.commit_delay_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid delay value: {}", value))
                })?;
            }
            ["teleport", "status_display_ms"] => {
                self.teleport.status_display_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid duration value: {}", value))
                })?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["location", "default_preset"] => {
                value
                    .parse::<crate::app::state::Preset>()
                    .map_err(Error::Config)?;
                self.location.default_preset = value.to_string();
            }
            ["location", "initial_lat"] => {
                self.location.initial_lat = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid latitude value: {}", value))
                })?;
            }
            ["location", "initial_lng"] => {
                self.location.initial_lng = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid longitude value: {}", value))
                })?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            ["api_keys", "gemini"] => {
                self.api_keys.gemini = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "search.model",
            "search.base_url",
            "search.max_results",
            "search.timeout_secs",
            "teleport.commit_delay_ms",
            "teleport.status_display_ms",
            "server.host",
            "server.port",
            "location.default_preset",
            "location.initial_lat",
            "location.initial_lng",
            "url.default",
            "api_keys.gemini",
        ]
    }

    /// Format a map URL using the specified provider
    ///
    /// Replaces {lat}, {lng} and {name} placeholders
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64, name: &str) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &format!("{:.6}", lat))
            .replace("{lng}", &format!("{:.6}", lng))
            .replace("{name}", &urlencoding::encode(name)))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        f();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.search.model, "gemini-3-flash-preview");
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.teleport.commit_delay_ms, 1200);
        assert_eq!(config.teleport.status_display_ms, 3000);
        assert_eq!(config.server.port, 7879);
        assert_eq!(config.location.default_preset, "dingtalk");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("search.model"), Some("gemini-3-flash-preview".to_string()));

        config.set("search.model", "gemini-2.5-flash").unwrap();
        assert_eq!(config.get("search.model"), Some("gemini-2.5-flash".to_string()));

        config.set("teleport.commit_delay_ms", "500").unwrap();
        assert_eq!(config.teleport.commit_delay_ms, 500);
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_port").is_err());
        assert!(config.set("search.max_results", "5").is_err());
        assert!(config.set("search.max_results", "0").is_err());
        assert!(config.set("location.default_preset", "qq").is_err());
        assert!(config.set("location.default_preset", "wechat").is_ok());
    }

    #[test]
    fn test_every_available_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "key {} not readable", key);
        }
    }

    #[test]
    fn test_format_url() {
        let config = Config::default();

        let url = config.format_url(None, 39.908692, 116.397477, "天安门").unwrap();
        assert_eq!(
            url,
            "https://uri.amap.com/marker?position=116.397477,39.908692&name=%E5%A4%A9%E5%AE%89%E9%97%A8&coordinate=gaode"
        );
    }

    #[test]
    fn test_format_url_unknown_provider() {
        let config = Config::default();
        assert!(config.format_url(Some("unknown"), 0.0, 0.0, "x").is_err());
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.search.model = "gemini-test".to_string();
            config.teleport.status_display_ms = 100;
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.search.model, "gemini-test");
            assert_eq!(loaded.teleport.status_display_ms, 100);
        });
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.server.host, "127.0.0.1");
        assert_eq!(loaded.teleport.commit_delay_ms, 1200);
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[search]"));
        assert!(toml.contains("[teleport]"));
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[url.providers]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7879");
    }
}
