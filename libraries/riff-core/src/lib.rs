//! Riff Player Core
//!
//! Platform-agnostic domain types, traits, and error handling shared by the
//! playback, catalog and storage crates.
//!
//! # Example
//!
//! ```rust
//! use riff_core::{QueueEntry, RepeatMode};
//!
//! let entry = QueueEntry::new("song-1", "Song", "Artist")
//!     .with_album("Album")
//!     .with_duration(215)
//!     .with_stream_url("https://cdn.example.com/song-1_320.mp4");
//!
//! assert_eq!(entry.duration_seconds, 215);
//! assert_eq!(RepeatMode::Off.next(), RepeatMode::One);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::KeyValueStore;
pub use types::{ArtworkSize, AudioQuality, QueueEntry, RepeatMode};
