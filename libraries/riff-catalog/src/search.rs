//! Paged search session
//!
//! Accumulates catalog results across pages into one ordered list, the way a
//! scrolling result view consumes them.

use tracing::{debug, warn};

use crate::client::SongCatalog;
use crate::error::Result;
use crate::types::CatalogSong;

/// Search state for one query
pub struct SearchSession<C> {
    catalog: C,
    query: String,
    results: Vec<CatalogSong>,
    page: u32,
    total: usize,
    loading: bool,
    error: Option<String>,
}

impl<C: SongCatalog> SearchSession<C> {
    /// Create an empty session
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            query: String::new(),
            results: Vec::new(),
            page: 1,
            total: 0,
            loading: false,
            error: None,
        }
    }

    /// Current query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Accumulated results in catalog order
    pub fn results(&self) -> &[CatalogSong] {
        &self.results
    }

    /// Last page fetched
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Total matches reported by the catalog
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether a request is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed request, cleared by the next success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The catalog this session searches
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Whether `load_more` would fetch anything
    pub fn has_more(&self) -> bool {
        !self.loading && !self.query.is_empty() && self.results.len() < self.total
    }

    /// Forget the query and every result
    pub fn reset(&mut self) {
        self.query.clear();
        self.results.clear();
        self.page = 1;
        self.total = 0;
        self.loading = false;
        self.error = None;
    }

    /// Start a new search and fetch its first page
    ///
    /// A blank query just resets the session.
    pub async fn start(&mut self, query: &str) -> Result<()> {
        self.reset();
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        self.query = query.to_string();
        self.fetch(1).await
    }

    /// Fetch the next page, if there is one
    ///
    /// Returns `Ok(false)` when nothing was fetched. On failure the results
    /// loaded so far are kept and the page counter does not advance.
    pub async fn load_more(&mut self) -> Result<bool> {
        if !self.has_more() {
            return Ok(false);
        }
        self.fetch(self.page + 1).await?;
        Ok(true)
    }

    async fn fetch(&mut self, page: u32) -> Result<()> {
        self.loading = true;
        let outcome = self.catalog.search_songs(&self.query, page).await;
        self.loading = false;

        match outcome {
            Ok(found) => {
                debug!(
                    query = %self.query,
                    page,
                    received = found.results.len(),
                    total = found.total,
                    "Search page loaded"
                );
                self.results.extend(found.results);
                self.total = found.total;
                self.page = page;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(query = %self.query, page, error = %e, "Search failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::types::SearchPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves `total` numbered songs in pages of `page_size`, failing on request
    struct PagedCatalog {
        total: usize,
        page_size: usize,
        fail_pages: Mutex<Vec<u32>>,
        requests: Mutex<Vec<(String, u32)>>,
    }

    impl PagedCatalog {
        fn new(total: usize, page_size: usize) -> Self {
            Self {
                total,
                page_size,
                fail_pages: Mutex::new(Vec::new()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SongCatalog for PagedCatalog {
        async fn search_songs(&self, query: &str, page: u32) -> Result<SearchPage> {
            self.requests.lock().unwrap().push((query.to_string(), page));
            if self.fail_pages.lock().unwrap().contains(&page) {
                return Err(CatalogError::Unsuccessful("search".into()));
            }
            let start = (page as usize - 1) * self.page_size;
            let end = (start + self.page_size).min(self.total);
            Ok(SearchPage {
                results: (start..end)
                    .map(|i| CatalogSong::new(format!("s{i}"), format!("Song {i}")))
                    .collect(),
                total: self.total,
            })
        }

        async fn song_details(&self, id: &str) -> Result<CatalogSong> {
            Err(CatalogError::NotFound(id.to_string()))
        }

        async fn song_suggestions(&self, _id: &str) -> Vec<CatalogSong> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn pages_accumulate_until_total() {
        let mut session = SearchSession::new(PagedCatalog::new(45, 20));
        session.start("rain").await.unwrap();
        assert_eq!(session.results().len(), 20);

        assert!(session.load_more().await.unwrap());
        assert!(session.load_more().await.unwrap());
        assert_eq!(session.results().len(), 45);
        assert_eq!(session.page(), 3);
        assert_eq!(session.results()[44].id, "s44");

        assert!(!session.has_more());
        assert!(!session.load_more().await.unwrap());
        assert_eq!(session.catalog().requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn blank_query_never_hits_the_catalog() {
        let mut session = SearchSession::new(PagedCatalog::new(10, 20));
        session.start("   ").await.unwrap();

        assert!(session.results().is_empty());
        assert!(!session.load_more().await.unwrap());
        assert!(session.catalog().requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_page_keeps_earlier_results() {
        let mut session = SearchSession::new(PagedCatalog::new(60, 20));
        session.start("rain").await.unwrap();
        session.catalog().fail_pages.lock().unwrap().push(2);

        assert!(session.load_more().await.is_err());
        assert_eq!(session.results().len(), 20);
        assert_eq!(session.page(), 1);
        assert!(session.error().is_some());

        session.catalog().fail_pages.lock().unwrap().clear();
        assert!(session.load_more().await.unwrap());
        assert_eq!(session.results().len(), 40);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn new_query_replaces_results() {
        let mut session = SearchSession::new(PagedCatalog::new(30, 20));
        session.start("rain").await.unwrap();
        session.load_more().await.unwrap();

        session.start("sun").await.unwrap();
        assert_eq!(session.query(), "sun");
        assert_eq!(session.results().len(), 20);
        assert_eq!(session.page(), 1);
    }
}
