//! HTTP catalog client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{CatalogError, Result};
use crate::types::{
    CatalogAlbum, CatalogArtist, CatalogSong, DataEnvelope, SearchEnvelope, SearchPage, SongList,
};

/// Default public catalog endpoint
pub const DEFAULT_BASE_URL: &str = "https://saavn.sumit.co";

/// Default number of results per search page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Catalog connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl CatalogConfig {
    /// Settings for `base_url` with default paging and timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Read-only song catalog
#[async_trait]
pub trait SongCatalog: Send + Sync {
    /// Fetch one page of song search results (pages start at 1)
    async fn search_songs(&self, query: &str, page: u32) -> Result<SearchPage>;

    /// Full metadata for one song
    async fn song_details(&self, id: &str) -> Result<CatalogSong>;

    /// Songs similar to `id`; failures degrade to an empty list
    async fn song_suggestions(&self, id: &str) -> Vec<CatalogSong>;
}

/// Album and artist browsing
#[async_trait]
pub trait BrowseCatalog: Send + Sync {
    /// Fetch one page of album search results (pages start at 1)
    async fn search_albums(&self, query: &str, page: u32) -> Result<SearchPage<CatalogAlbum>>;

    /// Fetch one page of artist search results (pages start at 1)
    async fn search_artists(&self, query: &str, page: u32) -> Result<SearchPage<CatalogArtist>>;

    /// Full metadata for one artist
    async fn artist_details(&self, id: &str) -> Result<CatalogArtist>;

    /// One page of an artist's songs; failures degrade to an empty list
    async fn artist_songs(&self, id: &str, page: u32) -> Vec<CatalogSong>;
}

/// Client for the catalog's JSON API.
///
/// # Example
///
/// ```ignore
/// use riff_catalog::{CatalogClient, CatalogConfig, SongCatalog};
///
/// let client = CatalogClient::new(CatalogConfig::default())?;
/// let page = client.search_songs("believer", 1).await?;
/// println!("{} of {} results", page.results.len(), page.total);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base: Url,
    page_size: u32,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("RiffPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            page_size: config.page_size,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Page size used for searches
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// `{base}/api/<segments...>` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// Check the status and parse the body
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// `GET {base}/api/search/{kind}` for one page
    async fn search<T: DeserializeOwned + Send>(
        &self,
        kind: &str,
        query: &str,
        page: u32,
    ) -> Result<SearchPage<T>> {
        let url = self.endpoint(&["search", kind])?;
        debug!(url = %url, query = %query, page, "Searching catalog");

        let response = self
            .http
            .get(url)
            .query(&[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("limit", self.page_size.to_string()),
            ])
            .send()
            .await?;

        let envelope: SearchEnvelope<T> = Self::parse(response).await?;
        if !envelope.success {
            return Err(CatalogError::Unsuccessful(format!("{kind} search \"{query}\"")));
        }

        let data = envelope.data.unwrap_or_default();
        debug!(
            kind,
            results = data.results.len(),
            total = data.total,
            "Search page received"
        );
        Ok(SearchPage {
            results: data.results,
            total: data.total,
        })
    }

    /// Fetch `url` and unwrap its `data`, failing on `success == false`
    async fn fetch_data<T: DeserializeOwned + Send>(&self, url: Url) -> Result<Option<T>> {
        let response = self.http.get(url.clone()).send().await?;
        let envelope: DataEnvelope<T> = Self::parse(response).await?;
        if !envelope.success {
            return Err(CatalogError::Unsuccessful(url.path().to_string()));
        }
        Ok(envelope.data)
    }

    async fn fetch_songs(&self, url: Url) -> Result<Vec<CatalogSong>> {
        Ok(self.fetch_data(url).await?.unwrap_or_default())
    }

    async fn fetch_artist_songs(&self, id: &str, page: u32) -> Result<Vec<CatalogSong>> {
        let url = self.endpoint(&["artists", id, "songs"])?;
        debug!(url = %url, page, "Fetching artist songs");

        let response = self
            .http
            .get(url.clone())
            .query(&[("page", page.to_string()), ("limit", self.page_size.to_string())])
            .send()
            .await?;
        let envelope: DataEnvelope<SongList> = Self::parse(response).await?;
        if !envelope.success {
            return Err(CatalogError::Unsuccessful(url.path().to_string()));
        }
        Ok(envelope.data.map(SongList::into_songs).unwrap_or_default())
    }
}

#[async_trait]
impl SongCatalog for CatalogClient {
    async fn search_songs(&self, query: &str, page: u32) -> Result<SearchPage> {
        self.search("songs", query, page).await
    }

    async fn song_details(&self, id: &str) -> Result<CatalogSong> {
        let url = self.endpoint(&["songs", id])?;
        debug!(url = %url, "Fetching song details");

        self.fetch_songs(url)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn song_suggestions(&self, id: &str) -> Vec<CatalogSong> {
        let url = match self.endpoint(&["songs", id, "suggestions"]) {
            Ok(url) => url,
            Err(e) => {
                warn!(song_id = %id, error = %e, "Cannot build suggestions URL");
                return Vec::new();
            }
        };
        debug!(url = %url, "Fetching suggestions");

        self.fetch_songs(url).await.unwrap_or_else(|e| {
            warn!(song_id = %id, error = %e, "Suggestions unavailable");
            Vec::new()
        })
    }
}

#[async_trait]
impl BrowseCatalog for CatalogClient {
    async fn search_albums(&self, query: &str, page: u32) -> Result<SearchPage<CatalogAlbum>> {
        self.search("albums", query, page).await
    }

    async fn search_artists(&self, query: &str, page: u32) -> Result<SearchPage<CatalogArtist>> {
        self.search("artists", query, page).await
    }

    async fn artist_details(&self, id: &str) -> Result<CatalogArtist> {
        let url = self.endpoint(&["artists", id])?;
        debug!(url = %url, "Fetching artist details");

        self.fetch_data(url)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn artist_songs(&self, id: &str, page: u32) -> Vec<CatalogSong> {
        self.fetch_artist_songs(id, page).await.unwrap_or_else(|e| {
            warn!(artist_id = %id, page, error = %e, "Artist songs unavailable");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments() {
        let client = CatalogClient::new(CatalogConfig::new("https://catalog.example.com/")).unwrap();
        let url = client.endpoint(&["songs", "a b/c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://catalog.example.com/api/songs/a%20b%2Fc"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client =
            CatalogClient::new(CatalogConfig::new("https://example.com/mirror")).unwrap();
        let url = client.endpoint(&["search", "songs"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/mirror/api/search/songs");
    }

    #[test]
    fn default_config_points_at_public_catalog() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.timeout_secs, 10);
    }
}
