//! Playback synchronizer
//!
//! Bridges the synchronous state machine to the asynchronous audio driver.
//! Every action goes through [`PlaybackSynchronizer::dispatch`], which applies
//! it to the store and then reacts to the difference between the previous and
//! the new snapshot by issuing driver commands.
//!
//! At most one driver session exists at a time. Each load is tagged with a
//! fresh [`SessionGeneration`]; load completions and status reports whose
//! generation is no longer live are discarded, so a slow load for a track the
//! user already skipped can never touch the state.
//!
//! Dispatch spawns load tasks and therefore must run inside a tokio runtime.

use std::sync::Arc;

use riff_core::RepeatMode;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::driver::{
    AudioDriver, DriverSession, DriverStatus, LoadRequest, SessionGeneration, SessionMessage,
    StatusSink,
};
use crate::error::{DriverError, PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::state::PlaybackState;
use crate::store::{PlayerAction, PlayerStore};

/// Capacity of the UI event broadcast channel
const EVENT_CAPACITY: usize = 64;

/// Capacity of the command channel used by [`PlayerHandle`]
const COMMAND_CAPACITY: usize = 64;

/// What the synchronizer holds for the current track
enum SessionSlot {
    /// No session and nothing in flight
    Idle,
    /// A load was issued and has not completed
    Loading {
        generation: SessionGeneration,
        track_id: String,
    },
    /// A loaded session
    Active {
        generation: SessionGeneration,
        track_id: String,
        session: Box<dyn DriverSession>,
        /// Natural completion was already handled for this session
        finished: bool,
    },
}

impl SessionSlot {
    fn generation(&self) -> Option<SessionGeneration> {
        match self {
            Self::Idle => None,
            Self::Loading { generation, .. } | Self::Active { generation, .. } => Some(*generation),
        }
    }

    fn session_mut(&mut self) -> Option<&mut Box<dyn DriverSession>> {
        match self {
            Self::Active { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Record natural completion; `false` if it was already recorded
    fn mark_finished(&mut self) -> bool {
        match self {
            Self::Active { finished, .. } => !std::mem::replace(finished, true),
            Self::Loading { .. } => true,
            Self::Idle => false,
        }
    }
}

/// Reactive adapter between the player store and an audio driver
pub struct PlaybackSynchronizer {
    store: PlayerStore,
    driver: Arc<dyn AudioDriver>,
    generation: SessionGeneration,
    slot: SessionSlot,
    pending_seek: Option<f64>,
    messages_tx: mpsc::UnboundedSender<SessionMessage>,
    messages_rx: mpsc::UnboundedReceiver<SessionMessage>,
    events: broadcast::Sender<PlayerEvent>,
}

impl PlaybackSynchronizer {
    /// Create a synchronizer
    ///
    /// If the store already has a current track (it never does after plain
    /// hydration, but callers may build one by hand) nothing is loaded until
    /// the first action touches it.
    pub fn new(store: PlayerStore, driver: Arc<dyn AudioDriver>) -> Self {
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            driver,
            generation: SessionGeneration::default(),
            slot: SessionSlot::Idle,
            pending_seek: None,
            messages_tx,
            messages_rx,
            events,
        }
    }

    /// Current state
    pub fn state(&self) -> &PlaybackState {
        self.store.state()
    }

    /// Read-only subscription to state snapshots
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.store.subscribe()
    }

    /// Subscribe to player events
    pub fn events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// Generation of the live session or load, if any
    pub fn live_generation(&self) -> Option<SessionGeneration> {
        self.slot.generation()
    }

    /// Whether a session is loaded
    pub fn has_session(&self) -> bool {
        matches!(self.slot, SessionSlot::Active { .. })
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self.slot, SessionSlot::Loading { .. })
    }

    /// Seek buffered until the next load, if any
    pub fn pending_seek(&self) -> Option<f64> {
        self.pending_seek
    }

    // ===== Actions =====

    /// Apply an action and drive the audio driver accordingly
    pub fn dispatch(&mut self, action: PlayerAction) {
        let is_navigation = action.is_navigation();
        let is_seek = matches!(action, PlayerAction::Seek(_));

        let Some(previous) = self.store.apply(action) else {
            return;
        };
        self.react(&previous, is_navigation);

        if is_seek {
            self.forward_seek();
        }
    }

    /// React to the transition from `previous` to the current state
    fn react(&mut self, previous: &PlaybackState, is_navigation: bool) {
        let (track_changed, same_track_selected, volume_changed, queue_changed) = {
            let current = self.store.state();
            let track_changed = previous.current_track_id != current.current_track_id;
            (
                track_changed,
                !track_changed && is_navigation && current.current_track_id.is_some(),
                previous.volume != current.volume,
                previous.queue != current.queue,
            )
        };

        if queue_changed {
            self.emit(PlayerEvent::QueueChanged {
                length: self.store.state().queue.len(),
            });
        }

        if track_changed {
            let track_id = self.store.state().current_track_id.clone();
            info!(
                track_id = ?track_id,
                previous_track_id = ?previous.current_track_id,
                "Current track changed"
            );
            self.emit(PlayerEvent::TrackChanged {
                track_id,
                previous_track_id: previous.current_track_id.clone(),
            });
            self.pending_seek = None;
            self.start_session();
        } else if same_track_selected {
            debug!("Same track selected again, restarting from zero");
            self.pending_seek = None;
            self.start_session();
        }

        // A failed load may already have paused again
        let is_playing = self.store.state().is_playing;
        if previous.is_playing != is_playing {
            self.emit(PlayerEvent::StateChanged { is_playing });
            if !track_changed && !same_track_selected {
                self.apply_transport();
            }
        }

        if volume_changed {
            let volume = self.store.state().volume;
            if let Some(session) = self.slot.session_mut() {
                debug!(volume, "Forwarding volume");
                if let Err(e) = session.set_volume(volume) {
                    warn!(error = %e, "Driver rejected volume change");
                }
            }
        }
    }

    /// Forward a user seek, or buffer it until the next load
    fn forward_seek(&mut self) {
        let position = self.store.state().position_seconds;
        match &mut self.slot {
            SessionSlot::Active {
                session, finished, ..
            } => {
                debug!(position, "Forwarding seek");
                *finished = false;
                if let Err(e) = session.seek(position) {
                    warn!(error = %e, "Driver rejected seek");
                }
            }
            _ => {
                debug!(position, "No session, buffering seek");
                self.pending_seek = Some(position);
            }
        }
    }

    /// Apply the desired transport flag to the session
    fn apply_transport(&mut self) {
        let is_playing = self.store.state().is_playing;
        if let Some(session) = self.slot.session_mut() {
            let result = if is_playing {
                session.play()
            } else {
                session.pause()
            };
            if let Err(e) = result {
                warn!(error = %e, is_playing, "Driver rejected transport command");
            }
            return;
        }

        // A pending load applies the transport when it completes
        let idle = matches!(self.slot, SessionSlot::Idle);
        if idle && is_playing && self.store.state().current_entry().is_some() {
            debug!("Play requested with no session, loading current track");
            self.start_session();
        }
    }

    // ===== Sessions =====

    /// Release whatever session exists and load the current track, if any
    fn start_session(&mut self) {
        self.release_session();

        let Some(entry) = self.store.state().current_entry().cloned() else {
            return;
        };
        let generation = self.generation.advance();

        if !entry.is_playable() {
            self.fail_load(&entry.id, "track has no stream URL".to_string());
            return;
        }

        debug!(
            track_id = %entry.id,
            generation = %generation,
            url = %entry.stream_url,
            "Loading stream"
        );

        let request = LoadRequest {
            url: entry.stream_url.clone(),
            generation,
            status: StatusSink::new(generation, self.messages_tx.clone()),
        };
        let driver = Arc::clone(&self.driver);
        let tx = self.messages_tx.clone();
        let track_id = entry.id.clone();

        tokio::spawn(async move {
            let result = driver.load(request).await;
            let message = SessionMessage::Loaded {
                generation,
                track_id,
                result,
            };
            // Nobody left to own the session
            if let Err(mpsc::error::SendError(SessionMessage::Loaded {
                result: Ok(mut session),
                ..
            })) = tx.send(message)
            {
                session.release();
            }
        });

        self.slot = SessionSlot::Loading {
            generation,
            track_id: entry.id,
        };
    }

    /// Drop the current session (soft) and forget any in-flight load
    fn release_session(&mut self) {
        match std::mem::replace(&mut self.slot, SessionSlot::Idle) {
            SessionSlot::Active {
                generation,
                track_id,
                mut session,
                ..
            } => {
                debug!(track_id = %track_id, generation = %generation, "Releasing session");
                session.release();
            }
            SessionSlot::Loading {
                generation,
                track_id,
            } => {
                debug!(track_id = %track_id, generation = %generation, "Abandoning in-flight load");
            }
            SessionSlot::Idle => {}
        }
    }

    /// Pause, drop the session and tell the UI; never retried automatically
    fn fail_load(&mut self, track_id: &str, message: String) {
        warn!(track_id = %track_id, error = %message, "Stream failed to load");
        self.release_session();
        self.pending_seek = None;
        self.dispatch(PlayerAction::Pause);
        self.emit(PlayerEvent::LoadFailed {
            track_id: track_id.to_string(),
            message,
        });
    }

    // ===== Driver messages =====

    /// Handle one message from a driver
    pub fn handle_session_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Loaded {
                generation,
                track_id,
                result,
            } => self.on_loaded(generation, track_id, result),
            SessionMessage::Status { generation, status } => self.on_status(generation, status),
        }
    }

    fn on_loaded(
        &mut self,
        generation: SessionGeneration,
        track_id: String,
        result: std::result::Result<Box<dyn DriverSession>, DriverError>,
    ) {
        let is_live = matches!(
            &self.slot,
            SessionSlot::Loading { generation: live, .. } if *live == generation
        );
        if !is_live {
            trace!(track_id = %track_id, generation = %generation, "Discarding stale load");
            if let Ok(mut session) = result {
                session.release();
            }
            return;
        }

        let mut session = match result {
            Ok(session) => session,
            Err(e) => {
                self.fail_load(&track_id, e.to_string());
                return;
            }
        };

        let volume = self.store.state().volume;
        let is_playing = self.store.state().is_playing;
        let pending_seek = self.pending_seek.take();
        if let Err(e) = prepare_session(session.as_mut(), volume, pending_seek, is_playing) {
            warn!(track_id = %track_id, error = %e, "Driver rejected initial session setup");
        }

        info!(track_id = %track_id, generation = %generation, "Stream loaded");
        self.slot = SessionSlot::Active {
            generation,
            track_id,
            session,
            finished: false,
        };
    }

    fn on_status(&mut self, generation: SessionGeneration, status: DriverStatus) {
        if self.slot.generation() != Some(generation) {
            trace!(generation = %generation, "Discarding status from stale session");
            return;
        }

        if let Some(message) = status.error {
            if let Some(track_id) = self.store.state().current_track_id.clone() {
                self.fail_load(&track_id, message);
            }
            return;
        }

        if status.duration_seconds > 0.0 {
            self.dispatch(PlayerAction::ReportDuration(status.duration_seconds));
        }
        self.dispatch(PlayerAction::ReportPosition(status.position_seconds));

        if status.finished {
            if self.slot.mark_finished() {
                self.on_track_finished();
            } else {
                trace!(generation = %generation, "Ignoring repeated completion");
            }
        }
    }

    /// Natural completion of the current track
    fn on_track_finished(&mut self) {
        let Some(finished_id) = self.store.state().current_track_id.clone() else {
            return;
        };
        debug!(track_id = %finished_id, "Track finished");

        if self.store.state().repeat == RepeatMode::One {
            self.store.apply(PlayerAction::ReportPosition(0.0));
            self.pending_seek = None;
            self.start_session();
            return;
        }

        match self.store.apply(PlayerAction::PlayNext) {
            Some(previous) => self.react(&previous, true),
            None => {
                info!(track_id = %finished_id, "Reached end of queue");
                match self.store.apply(PlayerAction::Pause) {
                    Some(previous) => self.react(&previous, false),
                    // Already paused in state; still leave the driver paused
                    None => {
                        if let Some(session) = self.slot.session_mut() {
                            if let Err(e) = session.pause() {
                                warn!(error = %e, "Driver rejected pause at end of queue");
                            }
                        }
                    }
                }
                self.emit(PlayerEvent::PlaybackEnded {
                    track_id: finished_id,
                });
            }
        }
    }

    /// Wait for the next driver message and handle it
    pub async fn process_next(&mut self) {
        if let Some(message) = self.messages_rx.recv().await {
            self.handle_session_message(message);
        }
    }

    /// Handle every driver message that is already queued
    ///
    /// Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.messages_rx.try_recv() {
            self.handle_session_message(message);
            handled += 1;
        }
        handled
    }

    // ===== Event loop =====

    /// Run the cooperative loop until the command channel closes
    pub async fn run(mut self, mut commands: mpsc::Receiver<PlayerAction>) -> PlaybackState {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(action) => self.dispatch(action),
                    None => break,
                },
                Some(message) = self.messages_rx.recv() => self.handle_session_message(message),
            }
        }

        debug!("Command channel closed, shutting down player loop");
        self.release_session();
        self.store.state().clone()
    }

    /// Move the synchronizer onto its own task and return a handle to it
    pub fn spawn(self) -> (PlayerHandle, JoinHandle<PlaybackState>) {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CAPACITY);
        let handle = PlayerHandle {
            commands: commands_tx,
            state: self.subscribe(),
            events: self.events.clone(),
        };
        let task = tokio::spawn(self.run(commands_rx));
        (handle, task)
    }

    fn emit(&self, event: PlayerEvent) {
        // No subscribers is fine
        self.events.send(event).ok();
    }
}

/// Bring a freshly loaded session in line with the desired state
fn prepare_session(
    session: &mut dyn DriverSession,
    volume: f32,
    seek: Option<f64>,
    is_playing: bool,
) -> std::result::Result<(), DriverError> {
    session.set_volume(volume)?;
    if let Some(position) = seek {
        session.seek(position)?;
    }
    if is_playing {
        session.play()
    } else {
        session.pause()
    }
}

/// Cloneable front door to a spawned synchronizer
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<PlayerAction>,
    state: watch::Receiver<PlaybackState>,
    events: broadcast::Sender<PlayerEvent>,
}

impl PlayerHandle {
    /// Send an action to the player loop
    pub async fn dispatch(&self, action: PlayerAction) -> Result<()> {
        self.commands
            .send(action)
            .await
            .map_err(|_| PlaybackError::Closed)
    }

    /// Latest state snapshot
    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    /// Read-only subscription to state snapshots
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.clone()
    }

    /// Subscribe to player events
    pub fn events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}
