//! Time-expiring byte cache with background reaping.
//!
//! This crate provides the response cache used by the Pokedex shell:
//! - Byte payloads keyed by string (request URLs in practice)
//! - Entries stamped with their write time
//! - An optional background reaper that deletes entries older than the
//!   configured interval, once per interval
//! - A read-through helper for caching serialized fetch results
//!
//! # Example
//!
//! ```rust,ignore
//! use pokedex_cache::{CacheConfig, ExpiringCache};
//!
//! let cache = ExpiringCache::new(
//!     CacheConfig::default().with_interval(Duration::from_secs(7)),
//! );
//! cache.add("https://pokeapi.co/api/v2/location-area/", body);
//! let cached = cache.get("https://pokeapi.co/api/v2/location-area/");
//! ```

mod cache;
mod config;
mod fetch;
mod reaper;

pub use cache::{CacheEntry, CacheStats, ExpiringCache};
pub use config::{CacheConfig, DEFAULT_INTERVAL};
pub use fetch::fetch_cached;
