//! # Riff Catalog
//!
//! HTTP client for the song catalog Riff Player searches and streams from.
//!
//! ## Features
//!
//! - Paged song search, song details and suggestions
//! - Album and artist search, artist details and artist songs
//! - Lenient parsing of the catalog's loosely typed metadata
//! - Resolution of catalog metadata into playable `QueueEntry` values
//! - A `SearchSession` that accumulates pages for scrolling result views
//!
//! ## Example
//!
//! ```ignore
//! use riff_catalog::{CatalogClient, CatalogConfig, SearchSession, to_queue_entry};
//!
//! let client = CatalogClient::new(CatalogConfig::default())?;
//! let mut search = SearchSession::new(client);
//! search.start("believer").await?;
//!
//! let entries: Vec<_> = search
//!     .results()
//!     .iter()
//!     .map(|song| to_queue_entry(song, Default::default()))
//!     .collect();
//! ```

mod client;
mod error;
mod resolve;
mod search;
mod types;

pub use client::{
    BrowseCatalog, CatalogClient, CatalogConfig, SongCatalog, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{CatalogError, Result};
pub use resolve::{
    artwork_url, select_variant, stream_url, to_queue_entry, ResolveOptions, UNKNOWN_ARTIST,
};
pub use search::SearchSession;
pub use types::{AlbumRef, CatalogAlbum, CatalogArtist, CatalogSong, SearchPage, Variant};
