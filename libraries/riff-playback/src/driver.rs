//! Audio driver abstraction
//!
//! The platform audio driver is opaque: it loads a URL into a session,
//! executes transport commands, and reports status asynchronously. Every load
//! is tagged with a `SessionGeneration`; status reports carry the same tag so
//! that the synchronizer can drop anything that belongs to a session it has
//! already replaced.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::DriverError;

/// Monotonic tag identifying one driver session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    /// Raw counter value
    pub fn value(self) -> u64 {
        self.0
    }

    /// Advance the counter and return the new generation
    pub fn advance(&mut self) -> Self {
        self.0 += 1;
        *self
    }
}

impl std::fmt::Display for SessionGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Status reported by a driver session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverStatus {
    /// Current position
    pub position_seconds: f64,
    /// Track length (0 while unknown)
    pub duration_seconds: f64,
    /// Whether audio is currently audible
    pub is_playing: bool,
    /// The track reached its natural end
    pub finished: bool,
    /// Network or decoding failure
    pub error: Option<String>,
}

impl DriverStatus {
    /// A plain progress report
    pub fn progress(position_seconds: f64, duration_seconds: f64) -> Self {
        Self {
            position_seconds,
            duration_seconds,
            is_playing: true,
            ..Default::default()
        }
    }

    /// Natural completion at `duration_seconds`
    pub fn finished(duration_seconds: f64) -> Self {
        Self {
            position_seconds: duration_seconds,
            duration_seconds,
            is_playing: false,
            finished: true,
            error: None,
        }
    }

    /// A failure report
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Messages flowing from drivers back into the synchronizer loop
pub enum SessionMessage {
    /// A load request finished
    Loaded {
        /// Generation the load was issued for
        generation: SessionGeneration,
        /// Track the load was issued for
        track_id: String,
        /// The new session, or why it could not be opened
        result: Result<Box<dyn DriverSession>, DriverError>,
    },
    /// A status report from a session
    Status {
        /// Generation of the reporting session
        generation: SessionGeneration,
        /// The report
        status: DriverStatus,
    },
}

impl std::fmt::Debug for SessionMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded {
                generation,
                track_id,
                result,
            } => f
                .debug_struct("Loaded")
                .field("generation", generation)
                .field("track_id", track_id)
                .field("ok", &result.is_ok())
                .finish(),
            Self::Status { generation, status } => f
                .debug_struct("Status")
                .field("generation", generation)
                .field("status", status)
                .finish(),
        }
    }
}

/// Per-session status callback handed to the driver on load
#[derive(Debug, Clone)]
pub struct StatusSink {
    generation: SessionGeneration,
    tx: mpsc::UnboundedSender<SessionMessage>,
}

impl StatusSink {
    pub(crate) fn new(
        generation: SessionGeneration,
        tx: mpsc::UnboundedSender<SessionMessage>,
    ) -> Self {
        Self { generation, tx }
    }

    /// Generation this sink reports for
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    /// Report status
    ///
    /// Returns `false` once the synchronizer is gone; drivers may use that to
    /// stop their reporting loop.
    pub fn report(&self, status: DriverStatus) -> bool {
        self.tx
            .send(SessionMessage::Status {
                generation: self.generation,
                status,
            })
            .is_ok()
    }

    /// Whether the synchronizer is still listening
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// A request to open a stream
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Stream URL
    pub url: String,
    /// Generation the session will carry
    pub generation: SessionGeneration,
    /// Where the session reports status
    pub status: StatusSink,
}

/// Platform audio driver
#[async_trait]
pub trait AudioDriver: Send + Sync + 'static {
    /// Open `request.url`
    ///
    /// The returned session starts paused; the synchronizer applies the
    /// desired transport state, volume and seek right after.
    ///
    /// # Errors
    /// Returns `DriverError::Load` if the stream cannot be opened
    async fn load(&self, request: LoadRequest) -> Result<Box<dyn DriverSession>, DriverError>;
}

/// One loaded stream, exclusively owned by the synchronizer
pub trait DriverSession: Send {
    /// Start or resume audio
    fn play(&mut self) -> Result<(), DriverError>;

    /// Pause audio
    fn pause(&mut self) -> Result<(), DriverError>;

    /// Seek to `seconds`
    fn seek(&mut self, seconds: f64) -> Result<(), DriverError>;

    /// Set output volume in `[0, 1]`
    fn set_volume(&mut self, volume: f32) -> Result<(), DriverError>;

    /// Release native resources
    ///
    /// Soft cancellation: the caller does not wait for the release to finish.
    fn release(&mut self);
}
