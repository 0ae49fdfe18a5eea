//! Read-through helper for caching serialized fetch results.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::ExpiringCache;

/// Return the value cached under `key`, or fetch, cache and return it.
///
/// Cached payloads are JSON. A payload that no longer decodes as `T` is
/// dropped and refetched. Fetch errors are returned as-is and nothing is
/// cached for them.
pub async fn fetch_cached<T, E, F, Fut>(cache: &ExpiringCache, key: &str, fetch: F) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(bytes) = cache.get(key) {
        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                debug!(key = %key, "Serving cached response");
                return Ok(value);
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cached payload failed to decode, refetching");
                cache.remove(key);
            }
        }
    }

    let value = fetch().await?;

    match serde_json::to_vec(&value) {
        Ok(bytes) => cache.add(key, bytes),
        Err(e) => warn!(key = %key, error = %e, "Failed to serialize response for cache"),
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use serde::Deserialize;
    use std::cell::Cell;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Page {
        next: Option<String>,
        names: Vec<String>,
    }

    fn page() -> Page {
        Page {
            next: Some("page-2".to_string()),
            names: vec!["canalave-city-area".to_string(), "eterna-city-area".to_string()],
        }
    }

    fn cache() -> ExpiringCache {
        ExpiringCache::new(
            CacheConfig::new()
                .with_interval(Duration::from_secs(60))
                .without_reaping(),
        )
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores() {
        let cache = cache();
        let calls = Cell::new(0);
        let counter = &calls;

        let value: Result<Page, String> = fetch_cached(&cache, "page-1", move || async move {
            counter.set(counter.get() + 1);
            Ok(page())
        })
        .await;

        assert_eq!(value.unwrap(), page());
        assert_eq!(calls.get(), 1);
        assert!(cache.contains("page-1"));
    }

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let cache = cache();
        cache.add("page-1", serde_json::to_vec(&page()).unwrap());

        let calls = Cell::new(0);
        let counter = &calls;

        let value: Result<Page, String> = fetch_cached(&cache, "page-1", move || async move {
            counter.set(counter.get() + 1);
            Ok(page())
        })
        .await;

        assert_eq!(value.unwrap(), page());
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_error_is_not_cached() {
        let cache = cache();

        let value: Result<Page, String> =
            fetch_cached(&cache, "page-1", || async { Err("status 500".to_string()) }).await;

        assert_eq!(value.unwrap_err(), "status 500");
        assert!(!cache.contains("page-1"));
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_refetched() {
        let cache = cache();
        cache.add("page-1", b"not json".to_vec());
        let calls = Cell::new(0);
        let counter = &calls;

        let value: Result<Page, String> = fetch_cached(&cache, "page-1", move || async move {
            counter.set(counter.get() + 1);
            Ok(page())
        })
        .await;

        assert_eq!(value.unwrap(), page());
        assert_eq!(calls.get(), 1);
        let stored: Page = serde_json::from_slice(&cache.get("page-1").unwrap()).unwrap();
        assert_eq!(stored, page());
    }
}
