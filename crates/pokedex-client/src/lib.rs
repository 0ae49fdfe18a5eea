//! Cached HTTP client for the PokeAPI location endpoints.
//!
//! Every request goes through a shared [`pokedex_cache::ExpiringCache`],
//! keyed by the absolute request URL, so paging back and forth or exploring
//! the same area twice within the cache interval does not hit the network.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use pokedex_cache::ExpiringCache;
//! use pokedex_client::{PokeApiClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let cache = ExpiringCache::with_interval(Duration::from_secs(7));
//! let client = PokeApiClient::builder().cache(cache).build()?;
//!
//! // First page of location areas
//! let page = client.location_areas().page(None).await?;
//!
//! // Follow the cursor
//! if let Some(next) = page.next.as_deref() {
//!     let page = client.location_areas().page(Some(next)).await?;
//!     println!("{} areas on page 2", page.results.len());
//! }
//!
//! // Pokemon in an area
//! let area = client.location_areas().get("pastoria-city-area").await?;
//! for name in area.pokemon_names() {
//!     println!("- {}", name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::LocationAreasApi;
pub use client::{ClientBuilder, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PokeApiClient};
pub use error::{Error, Result};
pub use types::*;
