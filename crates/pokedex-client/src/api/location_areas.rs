//! Location areas API.

use url::Url;

use crate::client::PokeApiClient;
use crate::error::{Error, Result};
use crate::types::{LocationArea, NamedResourcePage};

/// Location areas API client.
pub struct LocationAreasApi {
    client: PokeApiClient,
}

impl LocationAreasApi {
    pub(crate) fn new(client: PokeApiClient) -> Self {
        Self { client }
    }

    /// URL of the first listing page.
    pub fn first_page_url(&self) -> Result<String> {
        let path = format!(
            "location-area/?offset=0&limit={}",
            self.client.page_size()
        );
        Ok(self.client.url(&path)?.to_string())
    }

    /// Fetch one listing page.
    ///
    /// `None` fetches the first page. Otherwise `url` is a `next` or
    /// `previous` link taken from an earlier page.
    pub async fn page(&self, url: Option<&str>) -> Result<NamedResourcePage> {
        match url {
            Some(url) => self.client.get_json(url).await,
            None => {
                let url = self.first_page_url()?;
                self.client.get_json(&url).await
            }
        }
    }

    /// Fetch a location area by name or id.
    pub async fn get(&self, name: &str) -> Result<LocationArea> {
        let url = self.area_url(name)?;
        self.client.get_url(url).await
    }

    /// URL of one area. The name always lands in a single path segment.
    pub(crate) fn area_url(&self, name: &str) -> Result<Url> {
        let name = name.trim();
        match name {
            "" => {
                return Err(Error::InvalidArgument(
                    "location area name is required".to_string(),
                ));
            }
            "." | ".." => {
                return Err(Error::InvalidArgument(format!(
                    "invalid location area name: {name}"
                )));
            }
            _ => {}
        }

        let mut url = self.client.url("location-area/")?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidArgument("base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}
