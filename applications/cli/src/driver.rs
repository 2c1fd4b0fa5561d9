//! Simulated audio driver
//!
//! Stands in for a platform audio backend: it "plays" a stream by advancing a
//! clock on a timer and reporting it through the session's status sink, and
//! reports natural completion once the clock reaches the track length.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use riff_core::QueueEntry;
use riff_playback::{AudioDriver, DriverError, DriverSession, DriverStatus, LoadRequest};
use tracing::{debug, trace};

/// Length assumed for streams with no known duration
const FALLBACK_LENGTH_SECS: f64 = 30.0;

#[derive(Debug, Default)]
struct Clock {
    position: f64,
    playing: bool,
    finished: bool,
    released: bool,
    volume: f32,
}

/// Timer-driven driver that never touches real audio
pub struct SimulatedDriver {
    tick: Duration,
    speed: f64,
    lengths: HashMap<String, f64>,
}

impl SimulatedDriver {
    /// Create a driver reporting every `tick`
    pub fn new(tick: Duration) -> Self {
        Self {
            tick,
            speed: 1.0,
            lengths: HashMap::new(),
        }
    }

    /// Advance the clock `speed` times faster than real time
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };
        self
    }

    /// Take stream lengths from queue entries
    #[must_use]
    pub fn with_entries<'a>(mut self, entries: impl IntoIterator<Item = &'a QueueEntry>) -> Self {
        for entry in entries {
            if entry.duration_seconds > 0 {
                self.lengths
                    .insert(entry.stream_url.clone(), f64::from(entry.duration_seconds));
            }
        }
        self
    }

    fn length_of(&self, url: &str) -> f64 {
        self.lengths
            .get(url)
            .copied()
            .unwrap_or(FALLBACK_LENGTH_SECS)
    }
}

#[async_trait]
impl AudioDriver for SimulatedDriver {
    async fn load(&self, request: LoadRequest) -> Result<Box<dyn DriverSession>, DriverError> {
        if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
            return Err(DriverError::Load(format!(
                "unsupported stream URL: {}",
                request.url
            )));
        }

        let length = self.length_of(&request.url);
        let clock = Arc::new(Mutex::new(Clock {
            volume: 1.0,
            ..Clock::default()
        }));
        debug!(url = %request.url, generation = %request.generation, length, "Simulated stream opened");

        let step = self.tick.as_secs_f64() * self.speed;
        let tick = self.tick;
        let sink = request.status;
        let ticking = Arc::clone(&clock);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;

                let status = {
                    let Ok(mut clock) = ticking.lock() else {
                        break;
                    };
                    if clock.released {
                        break;
                    }
                    if !clock.playing {
                        continue;
                    }

                    clock.position = (clock.position + step).min(length);
                    if clock.position >= length {
                        clock.playing = false;
                        clock.finished = true;
                        DriverStatus::finished(length)
                    } else {
                        DriverStatus::progress(clock.position, length)
                    }
                };

                trace!(generation = %sink.generation(), position = status.position_seconds, "Tick");
                if !sink.report(status) {
                    break;
                }
            }
        });

        Ok(Box::new(SimulatedSession { clock }))
    }
}

struct SimulatedSession {
    clock: Arc<Mutex<Clock>>,
}

impl SimulatedSession {
    fn with_clock(&self, f: impl FnOnce(&mut Clock)) -> Result<(), DriverError> {
        let mut clock = self.clock.lock().map_err(|_| DriverError::Closed)?;
        if clock.released {
            return Err(DriverError::Closed);
        }
        f(&mut clock);
        Ok(())
    }
}

impl DriverSession for SimulatedSession {
    fn play(&mut self) -> Result<(), DriverError> {
        self.with_clock(|clock| {
            if !clock.finished {
                clock.playing = true;
            }
        })
    }

    fn pause(&mut self) -> Result<(), DriverError> {
        self.with_clock(|clock| clock.playing = false)
    }

    fn seek(&mut self, seconds: f64) -> Result<(), DriverError> {
        self.with_clock(|clock| {
            clock.position = seconds.max(0.0);
            clock.finished = false;
        })
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), DriverError> {
        self.with_clock(|clock| clock.volume = volume)
    }

    fn release(&mut self) {
        if let Ok(mut clock) = self.clock.lock() {
            clock.released = true;
            clock.playing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riff_playback::{PlaybackSynchronizer, PlayerAction, PlayerStore};

    fn entry(id: &str, seconds: u32) -> QueueEntry {
        QueueEntry::new(id, id, "Artist")
            .with_duration(seconds)
            .with_stream_url(format!("https://cdn.example.com/{id}.mp4"))
    }

    #[tokio::test(start_paused = true)]
    async fn plays_through_a_queue() {
        let entries = [entry("a", 2), entry("b", 2)];
        let driver =
            SimulatedDriver::new(Duration::from_millis(500)).with_entries(entries.iter());
        let mut sync = PlaybackSynchronizer::new(PlayerStore::default(), Arc::new(driver));

        for entry in entries {
            sync.dispatch(PlayerAction::Enqueue(entry));
        }
        while sync.state().is_playing {
            sync.process_next().await;
        }

        assert_eq!(sync.state().current_track_id.as_deref(), Some("b"));
        assert_eq!(sync.state().position_seconds, 2.0);
    }

    #[tokio::test]
    async fn rejects_non_http_streams() {
        let driver = SimulatedDriver::new(Duration::from_millis(10));
        let mut sync = PlaybackSynchronizer::new(PlayerStore::default(), Arc::new(driver));
        let mut events = sync.events();

        sync.dispatch(PlayerAction::Enqueue(
            QueueEntry::new("x", "x", "Artist").with_stream_url("file:///tmp/x.mp3"),
        ));
        sync.process_next().await;

        assert!(!sync.state().is_playing);
        let mut failed = false;
        while let Ok(event) = events.try_recv() {
            failed |= matches!(event, riff_playback::PlayerEvent::LoadFailed { .. });
        }
        assert!(failed);
    }
}
