//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use pokedex_cache::{ExpiringCache, fetch_cached};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::api::LocationAreasApi;
use crate::error::{Error, Result};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Default number of resources per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the client will request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// PokeAPI client.
///
/// Every GET is read through the shared [`ExpiringCache`], keyed by the
/// absolute request URL. Clones share the HTTP pool and the cache.
///
/// # Example
///
/// ```no_run
/// use pokedex_client::PokeApiClient;
///
/// # async fn example() -> pokedex_client::Result<()> {
/// let client = PokeApiClient::builder().build()?;
///
/// let page = client.location_areas().page(None).await?;
/// for area in &page.results {
///     println!("{}", area.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PokeApiClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Resources per listing page.
    pub(crate) page_size: u32,
    /// Response cache.
    pub(crate) cache: ExpiringCache,
}

impl PokeApiClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the response cache.
    pub fn cache(&self) -> &ExpiringCache {
        &self.inner.cache
    }

    /// Resources requested per listing page.
    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Access the location areas API.
    pub fn location_areas(&self) -> LocationAreasApi {
        LocationAreasApi::new(self.clone())
    }

    /// GET an absolute URL and decode the JSON body, through the cache.
    pub async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let url = Url::parse(url)?;
        self.get_url(url).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path relative to the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// GET a parsed URL through the cache.
    pub(crate) async fn get_url<T>(&self, url: Url) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = url.as_str().to_string();
        fetch_cached(&self.inner.cache, &key, || self.fetch(url)).await
    }

    /// Make an uncached GET request.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "Fetching from API");
        let response = self
            .inner
            .http
            .get(url)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        if response.status().is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();

        debug!(status, url = %url, "API request failed");

        if status == 404 {
            Error::NotFound(url)
        } else {
            Error::Api {
                status,
                message: body,
            }
        }
    }
}

impl std::fmt::Debug for PokeApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokeApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("page_size", &self.inner.page_size)
            .finish()
    }
}

/// Builder for creating a PokeApiClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    page_size: u32,
    cache: Option<ExpiringCache>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            page_size: DEFAULT_PAGE_SIZE,
            cache: None,
        }
    }

    /// Set the API root URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the number of resources per listing page.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Use an existing response cache.
    ///
    /// Without one, the client creates a cache with default settings.
    pub fn cache(mut self, cache: ExpiringCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<PokeApiClient> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("pokedex-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(PokeApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                page_size: self.page_size,
                cache: self.cache.unwrap_or_default(),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
