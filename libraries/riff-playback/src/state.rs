//! Queue and transport state machine
//!
//! `PlaybackState` is the single in-memory aggregate behind the player. Every
//! transition is synchronous and total: it either changes the state and
//! returns `true`, or leaves it untouched and returns `false`. None of them
//! perform I/O; the only non-determinism (shuffle) comes from the random
//! source passed in by the caller.
//!
//! Invariants upheld after every transition:
//! - empty queue ⇒ no current track and not playing
//! - the current track id, when set, is present in the queue
//! - volume stays within `[0, 1]`
//! - position is reset to zero whenever the current track id changes

use rand::Rng;
use riff_core::{QueueEntry, RepeatMode};
use serde::{Deserialize, Serialize};

/// Full in-memory transport and queue state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Ordered queue; insertion order is the linear playback order
    pub queue: Vec<QueueEntry>,

    /// Id of the current entry, if any
    pub current_track_id: Option<String>,

    /// Transport intent, independent of whether a driver session exists
    pub is_playing: bool,

    /// Playback clock, sourced from the driver
    pub position_seconds: f64,

    /// Track length, sourced from the driver once loaded
    pub duration_seconds: f64,

    /// Random forward navigation
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// Output volume in `[0, 1]`
    pub volume: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            current_track_id: None,
            is_playing: false,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: 1.0,
        }
    }
}

/// Persistable subset of the state: user-facing playback settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Shuffle flag
    #[serde(default)]
    pub shuffle: bool,

    /// Repeat mode
    #[serde(default)]
    pub repeat: RepeatMode,

    /// Volume in `[0, 1]`
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: default_volume(),
        }
    }
}

impl PlaybackState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Queries =====

    /// Index of the current entry (first entry with the current id)
    pub fn current_index(&self) -> Option<usize> {
        let id = self.current_track_id.as_deref()?;
        self.queue.iter().position(|entry| entry.id == id)
    }

    /// The current entry
    pub fn current_entry(&self) -> Option<&QueueEntry> {
        self.current_index().map(|index| &self.queue[index])
    }

    /// Whether an entry with `id` is queued
    pub fn contains(&self, id: &str) -> bool {
        self.queue.iter().any(|entry| entry.id == id)
    }

    /// Current settings snapshot
    pub fn settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            shuffle: self.shuffle,
            repeat: self.repeat,
            volume: self.volume,
        }
    }

    // ===== Transport =====

    /// Set the playing flag
    ///
    /// No-op on an empty queue. With a queue but nothing selected (a freshly
    /// hydrated queue), the first entry becomes current.
    pub fn play(&mut self) -> bool {
        if self.queue.is_empty() || self.is_playing {
            return false;
        }
        if self.current_index().is_none() {
            let first = self.queue[0].id.clone();
            self.select(Some(first));
        }
        self.is_playing = true;
        true
    }

    /// Clear the playing flag
    pub fn pause(&mut self) -> bool {
        if !self.is_playing {
            return false;
        }
        self.is_playing = false;
        true
    }

    /// Set the playback position
    ///
    /// Clamping to `[0, duration]` is the caller's job; non-finite values are
    /// ignored.
    pub fn set_position(&mut self, seconds: f64) -> bool {
        if !seconds.is_finite() || self.position_seconds == seconds {
            return false;
        }
        self.position_seconds = seconds;
        true
    }

    /// Set the track duration reported by the driver
    pub fn set_duration(&mut self, seconds: f64) -> bool {
        if !seconds.is_finite() || seconds < 0.0 || self.duration_seconds == seconds {
            return false;
        }
        self.duration_seconds = seconds;
        true
    }

    /// Set volume, clamped to `[0, 1]`
    pub fn set_volume(&mut self, volume: f32) -> bool {
        if volume.is_nan() {
            return false;
        }
        let volume = volume.clamp(0.0, 1.0);
        if self.volume == volume {
            return false;
        }
        self.volume = volume;
        true
    }

    // ===== Queue =====

    /// Append an entry
    ///
    /// With no current track the entry becomes current and playback starts.
    pub fn enqueue(&mut self, entry: QueueEntry) -> bool {
        let id = entry.id.clone();
        self.queue.push(entry);
        if self.current_track_id.is_none() {
            self.select(Some(id));
            self.is_playing = true;
        }
        true
    }

    /// Remove every entry with `id`
    ///
    /// Removing the current track promotes the first remaining entry; playback
    /// stops only if nothing remains.
    pub fn remove_from_queue(&mut self, id: &str) -> bool {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.id != id);
        if self.queue.len() == before {
            return false;
        }

        if self.current_track_id.as_deref() == Some(id) {
            let next = self.queue.first().map(|entry| entry.id.clone());
            self.select(next);
            if self.current_track_id.is_none() {
                self.is_playing = false;
            }
        }
        true
    }

    /// Empty the queue and stop
    pub fn clear_queue(&mut self) -> bool {
        if self.queue.is_empty() && self.current_track_id.is_none() && !self.is_playing {
            return false;
        }
        self.queue.clear();
        self.select(None);
        self.is_playing = false;
        self.position_seconds = 0.0;
        self.duration_seconds = 0.0;
        true
    }

    /// Move one entry from `from` to `to`
    ///
    /// Either index outside `[0, len)` is a no-op.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.queue.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let entry = self.queue.remove(from);
        self.queue.insert(to, entry);
        true
    }

    /// Replace the whole queue (used when hydrating persisted state)
    ///
    /// Keeps the current track if it is still present, otherwise stops.
    pub fn set_queue(&mut self, queue: Vec<QueueEntry>) -> bool {
        if self.queue == queue {
            return false;
        }
        self.queue = queue;
        let still_present = self
            .current_track_id
            .as_deref()
            .is_some_and(|id| self.queue.iter().any(|entry| entry.id == id));
        if !still_present {
            self.select(None);
            self.is_playing = false;
        }
        true
    }

    /// Play a specific entry, appending it only if its id is not queued yet
    pub fn play_track(&mut self, entry: QueueEntry) -> bool {
        let id = entry.id.clone();
        let appended = !self.contains(&id);
        if appended {
            self.queue.push(entry);
        }
        let before = (
            self.current_track_id.clone(),
            self.position_seconds,
            self.is_playing,
        );
        self.select(Some(id));
        self.position_seconds = 0.0;
        self.is_playing = true;
        appended
            || before
                != (
                    self.current_track_id.clone(),
                    self.position_seconds,
                    self.is_playing,
                )
    }

    // ===== Navigation =====

    /// Advance to the next entry
    ///
    /// Shuffle picks a uniformly random index (possibly the current one).
    /// Otherwise steps forward, wrapping only under `RepeatMode::All`.
    /// `RepeatMode::One` does not affect this; natural completion handles it.
    pub fn play_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(current) = self.current_index() else {
            return false;
        };
        let len = self.queue.len();

        let next = if self.shuffle {
            rng.gen_range(0..len)
        } else if current + 1 < len {
            current + 1
        } else if self.repeat == RepeatMode::All {
            0
        } else {
            return false;
        };

        self.jump_to(next);
        true
    }

    /// Step back to the previous entry
    ///
    /// Shuffle does not apply here. Wraps to the last entry only under
    /// `RepeatMode::All`.
    pub fn play_previous(&mut self) -> bool {
        let Some(current) = self.current_index() else {
            return false;
        };

        let previous = if current > 0 {
            current - 1
        } else if self.repeat == RepeatMode::All {
            self.queue.len() - 1
        } else {
            return false;
        };

        self.jump_to(previous);
        true
    }

    // ===== Modes =====

    /// Flip the shuffle flag
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        true
    }

    /// Advance `off → one → all → off`
    pub fn cycle_repeat(&mut self) -> bool {
        self.repeat = self.repeat.next();
        true
    }

    /// Apply persisted settings
    pub fn apply_settings(&mut self, settings: PlaybackSettings) -> bool {
        let before = self.settings();
        self.shuffle = settings.shuffle;
        self.repeat = settings.repeat;
        self.set_volume(settings.volume);
        before != self.settings()
    }

    // ===== Internal =====

    /// Make the entry at `index` current with the clock reset
    fn jump_to(&mut self, index: usize) {
        let id = self.queue[index].id.clone();
        self.select(Some(id));
        self.position_seconds = 0.0;
    }

    /// Change the current track id, resetting the clock when it changes
    fn select(&mut self, id: Option<String>) {
        if self.current_track_id == id {
            return;
        }
        self.current_track_id = id;
        self.position_seconds = 0.0;
        self.duration_seconds = self
            .current_entry()
            .map_or(0.0, |entry| f64::from(entry.duration_seconds));
    }
}
