//! Riff Player - Playback
//!
//! Queue and transport state machine plus the synchronizer that keeps an
//! opaque platform audio driver in step with it.
//!
//! This crate provides:
//! - `PlaybackState`: pure, synchronous queue/transport transitions
//! - `PlayerStore`: the single owner of the state, publishing snapshots
//! - `PlaybackSynchronizer`: reacts to state changes by driving an `AudioDriver`
//! - Persistence of the queue and settings through a `KeyValueStore`
//!
//! # Architecture
//!
//! `riff-playback` knows nothing about HTTP or any concrete audio backend.
//! Drivers implement [`AudioDriver`] and [`DriverSession`]; storage backends
//! implement `riff_core::KeyValueStore`.
//!
//! # Example: Queue Transitions
//!
//! ```rust
//! use riff_core::QueueEntry;
//! use riff_playback::{PlayerAction, PlayerStore};
//!
//! let mut store = PlayerStore::default();
//! store.apply(PlayerAction::Enqueue(QueueEntry::new("a", "First", "Artist")));
//! store.apply(PlayerAction::Enqueue(QueueEntry::new("b", "Second", "Artist")));
//! store.apply(PlayerAction::PlayNext);
//!
//! assert_eq!(store.state().current_track_id.as_deref(), Some("b"));
//! assert!(store.state().is_playing);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod events;
pub mod persistence;
pub mod state;
pub mod store;
pub mod synchronizer;

// Public exports
pub use driver::{
    AudioDriver, DriverSession, DriverStatus, LoadRequest, SessionGeneration, SessionMessage,
    StatusSink,
};
pub use error::{DriverError, PlaybackError, Result};
pub use events::PlayerEvent;
pub use persistence::{
    load_persisted, save_persisted, PersistedPlayer, PLAYER_STATE_KEY, QUEUE_STORAGE_KEY,
};
pub use state::{PlaybackSettings, PlaybackState};
pub use store::{PlayerAction, PlayerStore};
pub use synchronizer::{PlaybackSynchronizer, PlayerHandle};
