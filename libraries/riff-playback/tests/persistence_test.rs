//! Persistence round trips through an in-memory key-value store

use std::collections::HashMap;
use std::sync::Mutex;

use riff_core::{CoreError, KeyValueStore, QueueEntry, RepeatMode};
use riff_playback::{
    load_persisted, save_persisted, PlaybackState, PlayerAction, PlayerStore, PLAYER_STATE_KEY,
    QUEUE_STORAGE_KEY,
};

#[derive(Default)]
struct MemoryKv {
    values: Mutex<HashMap<String, String>>,
    read_only: bool,
}

impl KeyValueStore for MemoryKv {
    fn get_string(&self, key: &str) -> riff_core::Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> riff_core::Result<()> {
        if self.read_only {
            return Err(CoreError::storage("store is read-only"));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn entry(id: &str) -> QueueEntry {
    QueueEntry::new(id, format!("Track {id}"), "Artist")
        .with_album("Album")
        .with_duration(240)
        .with_artwork_url(format!("https://img.example.com/{id}_500x500.jpg"))
        .with_stream_url(format!("https://cdn.example.com/{id}_320.mp4"))
}

#[test]
fn queue_and_settings_survive_a_round_trip() {
    let kv = MemoryKv::default();
    let mut store = PlayerStore::default();
    for id in ["a", "b", "c", "d"] {
        store.apply(PlayerAction::Enqueue(entry(id)));
    }
    store.apply(PlayerAction::ToggleShuffle);
    store.apply(PlayerAction::CycleRepeat);
    store.apply(PlayerAction::CycleRepeat);
    store.apply(PlayerAction::SetVolume(0.3));
    save_persisted(store.state(), &kv);

    let restored = load_persisted(&kv).into_state();

    assert_eq!(restored.queue, store.state().queue);
    assert!(restored.shuffle);
    assert_eq!(restored.repeat, RepeatMode::All);
    assert_eq!(restored.volume, 0.3);
}

#[test]
fn restored_player_starts_paused_with_nothing_selected() {
    let kv = MemoryKv::default();
    let mut store = PlayerStore::default();
    store.apply(PlayerAction::Enqueue(entry("a")));
    store.apply(PlayerAction::ReportPosition(61.0));
    assert!(store.state().is_playing);
    save_persisted(store.state(), &kv);

    let restored = load_persisted(&kv).into_state();

    assert_eq!(restored.queue.len(), 1);
    assert!(restored.current_track_id.is_none());
    assert!(!restored.is_playing);
    assert_eq!(restored.position_seconds, 0.0);
}

#[test]
fn play_after_restore_selects_the_first_entry() {
    let kv = MemoryKv::default();
    let mut state = PlaybackState::new();
    state.set_queue(vec![entry("x"), entry("y")]);
    save_persisted(&state, &kv);

    let mut store = PlayerStore::new(load_persisted(&kv).into_state());
    store.apply(PlayerAction::Play);

    assert_eq!(store.state().current_track_id.as_deref(), Some("x"));
    assert!(store.state().is_playing);
}

#[test]
fn queue_slice_is_a_plain_camel_case_list() {
    let kv = MemoryKv::default();
    let mut state = PlaybackState::new();
    state.set_queue(vec![entry("a")]);
    save_persisted(&state, &kv);

    let raw = kv.get_string(QUEUE_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert!(json.is_array());
    assert_eq!(json[0]["id"], "a");
    assert_eq!(json[0]["durationSeconds"], 240);
    assert_eq!(json[0]["streamUrl"], "https://cdn.example.com/a_320.mp4");
}

#[test]
fn partial_settings_fall_back_to_defaults() {
    let kv = MemoryKv::default();
    kv.set(PLAYER_STATE_KEY, r#"{"repeat":"one"}"#).unwrap();

    let restored = load_persisted(&kv).into_state();

    assert!(!restored.shuffle);
    assert_eq!(restored.repeat, RepeatMode::One);
    assert_eq!(restored.volume, 1.0);
}

#[test]
fn write_failure_is_swallowed() {
    let kv = MemoryKv {
        read_only: true,
        ..Default::default()
    };
    let mut state = PlaybackState::new();
    state.set_queue(vec![entry("a")]);

    save_persisted(&state, &kv);

    assert!(kv.get_string(QUEUE_STORAGE_KEY).unwrap().is_none());
}
