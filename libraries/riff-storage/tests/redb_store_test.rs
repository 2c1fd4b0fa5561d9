//! RedbStore tests on temporary files

use riff_core::{KeyValueStore, QueueEntry, RepeatMode};
use riff_playback::{load_persisted, save_persisted, PlaybackState, PlayerAction, PlayerStore};
use riff_storage::RedbStore;
use tempfile::TempDir;

fn entry(id: &str) -> QueueEntry {
    QueueEntry::new(id, format!("Track {id}"), "Artist")
        .with_duration(180)
        .with_stream_url(format!("https://cdn.example.com/{id}.mp4"))
}

#[test]
fn test_missing_key_on_fresh_database() {
    let dir = TempDir::new().unwrap();
    let store = RedbStore::open(dir.path().join("riff.redb")).unwrap();

    assert!(store.get_string("music_player_queue").unwrap().is_none());
}

#[test]
fn test_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("data").join("riff.redb");

    let store = RedbStore::open(&path).unwrap();

    assert!(path.exists());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("riff.redb");

    {
        let store = RedbStore::open(&path).unwrap();
        store.set("greeting", "hello").unwrap();
        store.set("greeting", "hello again").unwrap();
    }

    let store = RedbStore::open(&path).unwrap();
    assert_eq!(
        store.get_string("greeting").unwrap().as_deref(),
        Some("hello again")
    );
}

#[test]
fn test_remove() {
    let dir = TempDir::new().unwrap();
    let store = RedbStore::open(dir.path().join("riff.redb")).unwrap();
    store.set("k", "v").unwrap();

    assert!(store.remove("k").unwrap());
    assert!(!store.remove("k").unwrap());
    assert!(store.get("k").unwrap().is_none());
}

#[test]
fn test_player_round_trip_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("riff.redb");

    let mut player = PlayerStore::default();
    for id in ["a", "b", "c"] {
        player.apply(PlayerAction::Enqueue(entry(id)));
    }
    player.apply(PlayerAction::CycleRepeat);
    player.apply(PlayerAction::SetVolume(0.25));

    {
        let store = RedbStore::open(&path).unwrap();
        save_persisted(player.state(), &store);
    }

    let store = RedbStore::open(&path).unwrap();
    let restored: PlaybackState = load_persisted(&store).into_state();

    assert_eq!(restored.queue, player.state().queue);
    assert_eq!(restored.repeat, RepeatMode::One);
    assert_eq!(restored.volume, 0.25);
    assert!(restored.current_track_id.is_none());
    assert!(!restored.is_playing);
}
