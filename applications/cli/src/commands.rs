//! Command implementations
//!
//! Every command hydrates the player from the key-value store, applies its
//! actions through `PlayerStore`, and persists the result.

use std::sync::Arc;
use std::time::Duration;

use riff_catalog::{
    to_queue_entry, BrowseCatalog, CatalogAlbum, CatalogArtist, CatalogClient, CatalogSong,
    SearchPage, SearchSession, SongCatalog,
};
use riff_core::{KeyValueStore, QueueEntry, RepeatMode};
use riff_playback::{
    load_persisted, save_persisted, PlaybackSettings, PlaybackState, PlaybackSynchronizer,
    PlayerAction, PlayerEvent, PlayerStore,
};
use riff_storage::RedbStore;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::config::RiffConfig;
use crate::driver::SimulatedDriver;
use crate::error::{CliError, Result};

/// Configuration plus the store the player is persisted in
pub struct App {
    pub config: RiffConfig,
    store: Box<dyn KeyValueStore>,
}

impl App {
    /// Open the configured redb file
    pub fn open(config: RiffConfig) -> Result<Self> {
        let store = RedbStore::open(&config.storage.path)?;
        Ok(Self::with_store(config, store))
    }

    /// Use an explicit store
    pub fn with_store(config: RiffConfig, store: impl KeyValueStore + 'static) -> Self {
        Self {
            config,
            store: Box::new(store),
        }
    }

    /// Catalog client for the configured endpoint
    pub fn catalog(&self) -> Result<CatalogClient> {
        Ok(CatalogClient::new(self.config.catalog_config())?)
    }

    /// Hydrated player store
    pub fn player(&self) -> PlayerStore {
        PlayerStore::new(load_persisted(self.store.as_ref()).into_state())
    }

    /// Persist queue and settings
    pub fn save(&self, state: &PlaybackState) {
        save_persisted(state, self.store.as_ref());
    }
}

// ===== Search =====

/// Search and return up to `pages` pages of results
pub async fn search(
    catalog: impl SongCatalog,
    query: &str,
    pages: u32,
) -> Result<Vec<CatalogSong>> {
    let mut session = SearchSession::new(catalog);
    session.start(query).await?;
    for _ in 1..pages.max(1) {
        if !session.load_more().await? {
            break;
        }
    }
    info!(
        query = %query,
        shown = session.results().len(),
        total = session.total(),
        "Search finished"
    );
    Ok(session.results().to_vec())
}

/// One page of albums matching `query`; a blank query matches nothing
pub async fn search_albums(
    catalog: &dyn BrowseCatalog,
    query: &str,
    page: u32,
) -> Result<SearchPage<CatalogAlbum>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchPage::default());
    }
    let found = catalog.search_albums(query, page.max(1)).await?;
    info!(query = %query, shown = found.results.len(), total = found.total, "Album search finished");
    Ok(found)
}

/// One page of artists matching `query`; a blank query matches nothing
pub async fn search_artists(
    catalog: &dyn BrowseCatalog,
    query: &str,
    page: u32,
) -> Result<SearchPage<CatalogArtist>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchPage::default());
    }
    let found = catalog.search_artists(query, page.max(1)).await?;
    info!(query = %query, shown = found.results.len(), total = found.total, "Artist search finished");
    Ok(found)
}

/// Artist metadata plus one page of their songs
pub async fn artist(
    catalog: &dyn BrowseCatalog,
    id: &str,
    page: u32,
) -> Result<(CatalogArtist, Vec<CatalogSong>)> {
    let details = catalog.artist_details(id).await?;
    let songs = catalog.artist_songs(id, page.max(1)).await;
    Ok((details, songs))
}

// ===== Queue =====

/// Current queue and transport snapshot
pub fn queue_list(app: &App) -> PlaybackState {
    app.player().state().clone()
}

/// Look up `song_id` and append it, plus up to `suggestions` similar songs
///
/// Returns the entries that were added.
pub async fn queue_add(
    app: &App,
    catalog: &dyn SongCatalog,
    song_id: &str,
    suggestions: usize,
) -> Result<Vec<QueueEntry>> {
    let options = app.config.resolve_options();
    let song = catalog.song_details(song_id).await?;
    let mut added = vec![to_queue_entry(&song, options)];

    if suggestions > 0 {
        let similar = catalog.song_suggestions(song_id).await;
        added.extend(
            similar
                .iter()
                .filter(|candidate| candidate.id != song_id)
                .take(suggestions)
                .map(|candidate| to_queue_entry(candidate, options)),
        );
    }

    enqueue_all(app, &added);
    Ok(added)
}

/// Append one page of an artist's songs
///
/// Returns the entries that were added; an empty page changes nothing.
pub async fn queue_add_artist(
    app: &App,
    catalog: &dyn BrowseCatalog,
    artist_id: &str,
    page: u32,
) -> Result<Vec<QueueEntry>> {
    let options = app.config.resolve_options();
    let added: Vec<_> = catalog
        .artist_songs(artist_id, page.max(1))
        .await
        .iter()
        .map(|song| to_queue_entry(song, options))
        .collect();

    if !added.is_empty() {
        enqueue_all(app, &added);
    }
    Ok(added)
}

fn enqueue_all(app: &App, entries: &[QueueEntry]) {
    let mut player = app.player();
    for entry in entries {
        debug!(track_id = %entry.id, title = %entry.title, "Queueing");
        player.apply(PlayerAction::Enqueue(entry.clone()));
    }
    app.save(player.state());
}

/// Remove every entry with `id`; returns whether anything was removed
pub fn queue_remove(app: &App, id: &str) -> bool {
    let mut player = app.player();
    let removed = player
        .apply(PlayerAction::RemoveFromQueue(id.to_string()))
        .is_some();
    if removed {
        app.save(player.state());
    }
    removed
}

/// Move the entry at `from` to `to` (both 1-based, as listed)
pub fn queue_move(app: &App, from: usize, to: usize) -> Result<()> {
    if from == 0 || to == 0 {
        return Err(CliError::InvalidArgument(
            "queue positions start at 1".to_string(),
        ));
    }
    let mut player = app.player();
    let len = player.state().queue.len();
    if from > len || to > len {
        return Err(CliError::InvalidArgument(format!(
            "positions must be between 1 and {len}"
        )));
    }
    if player
        .apply(PlayerAction::Reorder {
            from: from - 1,
            to: to - 1,
        })
        .is_some()
    {
        app.save(player.state());
    }
    Ok(())
}

/// Empty the queue
pub fn queue_clear(app: &App) {
    let mut player = app.player();
    player.apply(PlayerAction::ClearQueue);
    app.save(player.state());
}

// ===== Settings =====

/// Requested settings changes; `None` leaves a setting alone
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsUpdate {
    pub shuffle: Option<bool>,
    pub repeat: Option<RepeatMode>,
    pub volume: Option<f32>,
}

/// Apply `update` and return the resulting settings
pub fn settings(app: &App, update: SettingsUpdate) -> Result<PlaybackSettings> {
    if let Some(volume) = update.volume {
        if !(0.0..=1.0).contains(&volume) {
            return Err(CliError::InvalidArgument(format!(
                "volume must be between 0 and 1, got {volume}"
            )));
        }
    }

    let mut player = app.player();
    let current = player.state().settings();
    let wanted = PlaybackSettings {
        shuffle: update.shuffle.unwrap_or(current.shuffle),
        repeat: update.repeat.unwrap_or(current.repeat),
        volume: update.volume.unwrap_or(current.volume),
    };
    if player.apply(PlayerAction::ApplySettings(wanted)).is_some() {
        app.save(player.state());
    }
    Ok(player.state().settings())
}

// ===== Playback =====

/// How long and how fast to play
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    /// Wall-clock seconds to run for
    pub seconds: u64,
    /// Clock multiplier for the simulated driver
    pub speed: f64,
    /// Start at this queued track instead of the first
    pub track: Option<String>,
}

/// Play the persisted queue through the simulated driver
///
/// `on_event` sees every player event until the time is up or the queue ends.
/// The final queue and settings are persisted.
pub async fn play(
    app: &App,
    options: PlayOptions,
    mut on_event: impl FnMut(&PlayerEvent),
) -> Result<PlaybackState> {
    let store = app.player();
    if store.state().queue.is_empty() {
        return Err(CliError::InvalidArgument("the queue is empty".to_string()));
    }

    let start = match &options.track {
        Some(id) => {
            let entry = store
                .state()
                .queue
                .iter()
                .find(|entry| entry.id == *id)
                .cloned()
                .ok_or_else(|| CliError::InvalidArgument(format!("{id} is not queued")))?;
            PlayerAction::PlayTrack(entry)
        }
        None => PlayerAction::Play,
    };

    let driver = SimulatedDriver::new(app.config.tick())
        .with_speed(options.speed)
        .with_entries(store.state().queue.iter());
    let (handle, task) = PlaybackSynchronizer::new(store, Arc::new(driver)).spawn();
    let mut events = handle.events();

    handle.dispatch(start).await?;

    let deadline = tokio::time::sleep(Duration::from_secs(options.seconds));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            () = &mut deadline => {
                debug!("Play time elapsed");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    on_event(&event);
                    if matches!(event, PlayerEvent::PlaybackEnded { .. }) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Missed player events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.dispatch(PlayerAction::Pause).await?;
    drop(handle);
    let final_state = task.await?;

    app.save(&final_state);
    Ok(final_state)
}

/// `m:ss` rendering of a duration in seconds
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
