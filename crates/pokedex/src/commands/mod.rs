//! CLI command handlers.

pub mod config;
pub mod repl;
pub mod shell;

use std::path::PathBuf;

use pokedex_cache::{CacheConfig, ExpiringCache};
use pokedex_client::PokeApiClient;
use pokedex_config::{LoadedConfig, PokedexConfig, USER_CONFIG_FILE};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Config as discovered on disk, with its sources and warnings.
    pub loaded: LoadedConfig,
    /// Effective config after command-line overrides.
    pub config: PokedexConfig,
    /// Resolved user config directory.
    pub config_dir: Option<PathBuf>,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Path of the user config file.
    pub fn user_config_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|d| d.join(USER_CONFIG_FILE))
    }

    /// Build the response cache from the effective config.
    pub fn build_cache(&self) -> ExpiringCache {
        let cache = self.config.cache();
        ExpiringCache::new(
            CacheConfig::new()
                .with_interval(cache.interval())
                .with_reaping(cache.reaping),
        )
    }

    /// Build an API client that reads through `cache`.
    pub fn build_client(&self, cache: ExpiringCache) -> anyhow::Result<PokeApiClient> {
        let api = self.config.api();
        let timeout = api.timeout();
        let client = PokeApiClient::builder()
            .base_url(api.base_url)
            .timeout(timeout)
            .page_size(api.page_size)
            .cache(cache)
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_config::ApiSection;

    fn context(config: PokedexConfig) -> Context {
        Context {
            loaded: LoadedConfig {
                config: PokedexConfig::new(),
                sources: Vec::new(),
                warnings: Vec::new(),
            },
            config,
            config_dir: Some(PathBuf::from("/tmp/pokedex-test")),
            verbose: false,
        }
    }

    #[test]
    fn test_build_client_uses_api_section() {
        let ctx = context(PokedexConfig {
            api: Some(ApiSection {
                base_url: "http://localhost:9000/api/v2".to_string(),
                timeout_secs: 5,
                page_size: 7,
            }),
            ..Default::default()
        });

        let cache = ExpiringCache::new(CacheConfig::new().without_reaping());
        let client = ctx.build_client(cache.clone()).unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:9000/api/v2/");
        assert_eq!(client.page_size(), 7);

        cache.add("k", "v");
        assert!(client.cache().contains("k"));
    }

    #[test]
    fn test_build_cache_uses_cache_section() {
        let config =
            PokedexConfig::from_toml("[cache]\ninterval_ms = 250\nreaping = false\n").unwrap();
        let ctx = context(config);

        let cache = ctx.build_cache();
        assert_eq!(cache.interval().as_millis(), 250);
        assert!(!cache.is_reaping());
    }

    #[test]
    fn test_user_config_path() {
        let ctx = context(PokedexConfig::new());
        assert_eq!(
            ctx.user_config_path(),
            Some(PathBuf::from("/tmp/pokedex-test/config.toml"))
        );
    }
}
