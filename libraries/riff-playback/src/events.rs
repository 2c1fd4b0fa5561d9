//! Player events
//!
//! Broadcast to UI surfaces alongside the state subscription. State snapshots
//! tell the UI *what* is true now; events tell it *what happened*, which is
//! the only way to surface transient failures such as a stream that would not
//! load.

use serde::{Deserialize, Serialize};

/// Events emitted by the synchronizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// The current track changed (including to or from nothing)
    TrackChanged {
        /// New current track id
        track_id: Option<String>,
        /// Previous current track id
        previous_track_id: Option<String>,
    },

    /// The transport flag flipped
    StateChanged {
        /// New value of `is_playing`
        is_playing: bool,
    },

    /// Queue contents or order changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// A stream failed to load; playback was paused and the queue kept
    LoadFailed {
        /// Track whose stream failed
        track_id: String,
        /// Driver message
        message: String,
    },

    /// The last track of a non-repeating queue finished
    PlaybackEnded {
        /// Track that finished
        track_id: String,
    },
}
