//! Persisted player slices
//!
//! Two independent JSON blobs live in the key-value store: the queue as a
//! plain list of entries, and the user settings (shuffle, repeat, volume).
//! Transport state and the playback clock are never persisted, so a restored
//! player always starts paused with nothing selected.
//!
//! Hydration is forgiving: a missing, unreadable or malformed slice is logged
//! and treated as absent.

use riff_core::{KeyValueStore, QueueEntry};
use tracing::{debug, warn};

use crate::state::{PlaybackSettings, PlaybackState};

/// Storage key of the queue slice
pub const QUEUE_STORAGE_KEY: &str = "music_player_queue";

/// Storage key of the settings slice
pub const PLAYER_STATE_KEY: &str = "music_player_state";

/// Whatever could be restored from storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedPlayer {
    /// Restored queue, if the slice was present and valid
    pub queue: Option<Vec<QueueEntry>>,
    /// Restored settings, if the slice was present and valid
    pub settings: Option<PlaybackSettings>,
}

impl PersistedPlayer {
    /// Read both slices
    ///
    /// # Errors
    /// Returns an error if the store fails or a slice is malformed
    pub fn read(store: &dyn KeyValueStore) -> riff_core::Result<Self> {
        Ok(Self {
            queue: read_queue(store)?,
            settings: read_settings(store)?,
        })
    }

    /// Write both slices taken from `state`
    ///
    /// # Errors
    /// Returns an error if the store fails
    pub fn write(store: &dyn KeyValueStore, state: &PlaybackState) -> riff_core::Result<()> {
        let queue = serde_json::to_string(&state.queue)?;
        store.set(QUEUE_STORAGE_KEY, &queue)?;

        let settings = serde_json::to_string(&state.settings())?;
        store.set(PLAYER_STATE_KEY, &settings)?;
        Ok(())
    }

    /// Build a fresh state from the restored slices
    ///
    /// The queue is restored as-is with nothing selected and not playing.
    pub fn into_state(self) -> PlaybackState {
        let mut state = PlaybackState::new();
        if let Some(settings) = self.settings {
            state.apply_settings(settings);
        }
        if let Some(queue) = self.queue {
            state.set_queue(queue);
        }
        state
    }
}

/// Read the queue slice
///
/// # Errors
/// Returns an error if the store fails or the slice is malformed
pub fn read_queue(store: &dyn KeyValueStore) -> riff_core::Result<Option<Vec<QueueEntry>>> {
    let Some(raw) = store.get_string(QUEUE_STORAGE_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Read the settings slice
///
/// # Errors
/// Returns an error if the store fails or the slice is malformed
pub fn read_settings(store: &dyn KeyValueStore) -> riff_core::Result<Option<PlaybackSettings>> {
    let Some(raw) = store.get_string(PLAYER_STATE_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Restore whatever can be read, ignoring unreadable slices
///
/// Use [`PersistedPlayer::into_state`] to build the hydrated state.
pub fn load_persisted(store: &dyn KeyValueStore) -> PersistedPlayer {
    let queue = read_queue(store).unwrap_or_else(|e| {
        warn!(key = QUEUE_STORAGE_KEY, error = %e, "Ignoring unreadable persisted queue");
        None
    });
    let settings = read_settings(store).unwrap_or_else(|e| {
        warn!(key = PLAYER_STATE_KEY, error = %e, "Ignoring unreadable persisted settings");
        None
    });

    debug!(
        queue_len = queue.as_ref().map_or(0, Vec::len),
        has_settings = settings.is_some(),
        "Hydrated player state"
    );
    PersistedPlayer { queue, settings }
}

/// Persist the queue and settings; failures are logged and swallowed
pub fn save_persisted(state: &PlaybackState, store: &dyn KeyValueStore) {
    if let Err(e) = PersistedPlayer::write(store, state) {
        warn!(error = %e, "Failed to persist player state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    impl KeyValueStore for MapStore {
        fn get_string(&self, key: &str) -> riff_core::Result<Option<String>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> riff_core::Result<()> {
            self.0
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn empty_store_yields_default_state() {
        let store = MapStore::default();
        let persisted = load_persisted(&store);
        assert_eq!(persisted, PersistedPlayer::default());
        assert_eq!(persisted.into_state(), PlaybackState::default());
    }

    #[test]
    fn malformed_slice_is_ignored() {
        let store = MapStore::default();
        store.set(QUEUE_STORAGE_KEY, "not json").unwrap();
        store
            .set(PLAYER_STATE_KEY, r#"{"shuffle":true,"repeat":"all","volume":0.5}"#)
            .unwrap();

        let state = load_persisted(&store).into_state();
        assert!(state.queue.is_empty());
        assert!(state.shuffle);
        assert_eq!(state.volume, 0.5);
    }

    #[test]
    fn settings_slice_uses_lowercase_repeat() {
        let store = MapStore::default();
        let mut state = PlaybackState::new();
        state.cycle_repeat();
        save_persisted(&state, &store);

        let raw = store.get_string(PLAYER_STATE_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""repeat":"one""#));
    }
}
