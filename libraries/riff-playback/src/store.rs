//! Player store - the single owner of `PlaybackState`
//!
//! UI surfaces never mutate the state directly. They send a `PlayerAction`
//! and read snapshots from a `watch` subscription.

use rand::rngs::StdRng;
use rand::SeedableRng;
use riff_core::QueueEntry;
use tokio::sync::watch;

use crate::state::{PlaybackSettings, PlaybackState};

/// Every mutation the state machine accepts
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    /// Start or resume
    Play,
    /// Pause
    Pause,
    /// User seek; clamped to the known duration
    Seek(f64),
    /// Position reported by the driver
    ReportPosition(f64),
    /// Duration reported by the driver
    ReportDuration(f64),
    /// Set volume (clamped to `[0, 1]`)
    SetVolume(f32),
    /// Append to the queue
    Enqueue(QueueEntry),
    /// Remove every entry with this id
    RemoveFromQueue(String),
    /// Empty the queue
    ClearQueue,
    /// Move one entry
    Reorder {
        /// Source index
        from: usize,
        /// Destination index
        to: usize,
    },
    /// Replace the queue wholesale
    SetQueue(Vec<QueueEntry>),
    /// Play an entry, queueing it if needed
    PlayTrack(QueueEntry),
    /// Advance
    PlayNext,
    /// Step back
    PlayPrevious,
    /// Flip shuffle
    ToggleShuffle,
    /// Cycle repeat mode
    CycleRepeat,
    /// Apply persisted settings
    ApplySettings(PlaybackSettings),
}

impl PlayerAction {
    /// Actions that select a track explicitly and restart it from zero
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::PlayTrack(_) | Self::PlayNext | Self::PlayPrevious)
    }
}

/// Owned playback state behind a controlled mutation API
pub struct PlayerStore {
    state: PlaybackState,
    rng: StdRng,
    publisher: watch::Sender<PlaybackState>,
}

impl PlayerStore {
    /// Create a store around an initial (possibly hydrated) state
    pub fn new(state: PlaybackState) -> Self {
        Self::with_rng(state, StdRng::from_entropy())
    }

    /// Create a store with a specific random source (for reproducible shuffle)
    pub fn with_rng(state: PlaybackState, rng: StdRng) -> Self {
        let (publisher, _) = watch::channel(state.clone());
        Self {
            state,
            rng,
            publisher,
        }
    }

    /// Current state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Read-only subscription to state snapshots
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.publisher.subscribe()
    }

    /// Apply an action
    ///
    /// Returns the previous snapshot when the state changed, `None` for a
    /// no-op. Subscribers are only notified on change.
    pub fn apply(&mut self, action: PlayerAction) -> Option<PlaybackState> {
        let previous = self.state.clone();
        let state = &mut self.state;

        let changed = match action {
            PlayerAction::Play => state.play(),
            PlayerAction::Pause => state.pause(),
            PlayerAction::Seek(seconds) => {
                let target = clamp_seek(seconds, state.duration_seconds);
                state.set_position(target)
            }
            PlayerAction::ReportPosition(seconds) => state.set_position(seconds),
            PlayerAction::ReportDuration(seconds) => state.set_duration(seconds),
            PlayerAction::SetVolume(volume) => state.set_volume(volume),
            PlayerAction::Enqueue(entry) => state.enqueue(entry),
            PlayerAction::RemoveFromQueue(id) => state.remove_from_queue(&id),
            PlayerAction::ClearQueue => state.clear_queue(),
            PlayerAction::Reorder { from, to } => state.reorder(from, to),
            PlayerAction::SetQueue(queue) => state.set_queue(queue),
            PlayerAction::PlayTrack(entry) => state.play_track(entry),
            PlayerAction::PlayNext => state.play_next(&mut self.rng),
            PlayerAction::PlayPrevious => state.play_previous(),
            PlayerAction::ToggleShuffle => state.toggle_shuffle(),
            PlayerAction::CycleRepeat => state.cycle_repeat(),
            PlayerAction::ApplySettings(settings) => state.apply_settings(settings),
        };

        if !changed {
            return None;
        }
        self.publisher.send_replace(self.state.clone());
        Some(previous)
    }
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new(PlaybackState::default())
    }
}

/// Clamp a user seek to `[0, duration]`; an unknown (zero) duration only
/// bounds from below
fn clamp_seek(seconds: f64, duration: f64) -> f64 {
    let floor = seconds.max(0.0);
    if duration > 0.0 {
        floor.min(duration)
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> QueueEntry {
        QueueEntry::new(id, id, "Artist")
            .with_duration(200)
            .with_stream_url(format!("https://cdn.example.com/{id}.mp4"))
    }

    #[test]
    fn apply_returns_previous_snapshot_on_change() {
        let mut store = PlayerStore::default();
        let previous = store.apply(PlayerAction::Enqueue(entry("a"))).unwrap();

        assert!(previous.queue.is_empty());
        assert_eq!(store.state().queue.len(), 1);
    }

    #[test]
    fn noop_does_not_notify_subscribers() {
        let mut store = PlayerStore::default();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert!(store.apply(PlayerAction::Pause).is_none());
        assert!(!rx.has_changed().unwrap());

        store.apply(PlayerAction::Enqueue(entry("a")));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().queue.len(), 1);
    }

    #[test]
    fn seek_is_clamped_to_duration() {
        let mut store = PlayerStore::default();
        store.apply(PlayerAction::Enqueue(entry("a")));

        store.apply(PlayerAction::Seek(500.0));
        assert_eq!(store.state().position_seconds, 200.0);

        store.apply(PlayerAction::Seek(-3.0));
        assert_eq!(store.state().position_seconds, 0.0);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let picks = |seed: u64| {
            let mut store = PlayerStore::with_rng(PlaybackState::new(), StdRng::seed_from_u64(seed));
            for id in ["a", "b", "c", "d", "e"] {
                store.apply(PlayerAction::Enqueue(entry(id)));
            }
            store.apply(PlayerAction::ToggleShuffle);
            (0..10)
                .map(|_| {
                    store.apply(PlayerAction::PlayNext);
                    store.state().current_track_id.clone().unwrap()
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(picks(11), picks(11));
    }
}
