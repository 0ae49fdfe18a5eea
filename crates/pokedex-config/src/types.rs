//! Configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default cache interval in milliseconds.
pub const DEFAULT_CACHE_INTERVAL_MS: u64 = 7_000;

/// Default API root.
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default listing page size.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest accepted listing page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default console log filter.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Root configuration.
///
/// Each section is optional in a file; a missing section falls back to its
/// defaults, and a section present in a later layer replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokedexConfig {
    /// Response cache settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheSection>,

    /// API client settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiSection>,

    /// Logging settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSection>,
}

impl PokedexConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with every section filled in with defaults.
    pub fn with_defaults() -> Self {
        Self {
            cache: Some(CacheSection::default()),
            api: Some(ApiSection::default()),
            logging: Some(LoggingSection::default()),
        }
    }

    /// Parse a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: PokedexConfig) {
        if other.cache.is_some() {
            self.cache = other.cache;
        }

        if other.api.is_some() {
            self.api = other.api;
        }

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// Cache section, or defaults.
    pub fn cache(&self) -> CacheSection {
        self.cache.clone().unwrap_or_default()
    }

    /// API section, or defaults.
    pub fn api(&self) -> ApiSection {
        self.api.clone().unwrap_or_default()
    }

    /// Logging section, or defaults.
    pub fn logging(&self) -> LoggingSection {
        self.logging.clone().unwrap_or_default()
    }

    /// Check every value is within its allowed range.
    pub fn validate(&self) -> Result<()> {
        let cache = self.cache();
        if cache.interval_ms == 0 {
            return Err(ConfigError::invalid(
                "cache.interval_ms",
                "must be greater than 0",
            ));
        }

        let api = self.api();
        if api.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("api.base_url", "must not be empty"));
        }
        if api.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "api.timeout_secs",
                "must be greater than 0",
            ));
        }
        if api.page_size == 0 || api.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::invalid(
                "api.page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}, got {}", api.page_size),
            ));
        }

        if self.logging().level.trim().is_empty() {
            return Err(ConfigError::invalid("logging.level", "must not be empty"));
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Response cache section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Entry lifetime and reaper period, in milliseconds.
    pub interval_ms: u64,
    /// Run the background reaper.
    pub reaping: bool,
}

impl CacheSection {
    /// Interval as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_CACHE_INTERVAL_MS,
            reaping: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// API client section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// API root URL.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Resources per listing page.
    pub page_size: u32,
}

impl ApiSection {
    /// Timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Console filter directive (e.g. `warn`, `pokedex=debug,info`).
    pub level: String,
    /// Write JSON logs to `<config dir>/logs/`.
    pub file: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: true,
        }
    }
}
