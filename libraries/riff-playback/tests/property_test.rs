//! Property-based tests for the queue state machine
//!
//! Drives `PlayerStore` with random action sequences and checks the
//! invariants that must hold after every single transition.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use riff_core::QueueEntry;
use riff_playback::{PlaybackState, PlayerAction, PlayerStore};

// ===== Helpers =====

fn arbitrary_entry() -> impl Strategy<Value = QueueEntry> {
    (
        "[a-e]",           // id (small alphabet so duplicates and hits are common)
        "[A-Za-z ]{1,20}", // title
        0u32..600,         // duration
    )
        .prop_map(|(id, title, duration)| {
            QueueEntry::new(id.clone(), title, "Artist")
                .with_duration(duration)
                .with_stream_url(format!("https://cdn.example.com/{id}.mp4"))
        })
}

fn arbitrary_action() -> impl Strategy<Value = PlayerAction> {
    prop_oneof![
        Just(PlayerAction::Play),
        Just(PlayerAction::Pause),
        (-50.0f64..700.0).prop_map(PlayerAction::Seek),
        (0.0f64..700.0).prop_map(PlayerAction::ReportPosition),
        (-1.0f32..2.0).prop_map(PlayerAction::SetVolume),
        arbitrary_entry().prop_map(PlayerAction::Enqueue),
        "[a-e]".prop_map(PlayerAction::RemoveFromQueue),
        Just(PlayerAction::ClearQueue),
        (0usize..8, 0usize..8).prop_map(|(from, to)| PlayerAction::Reorder { from, to }),
        arbitrary_entry().prop_map(PlayerAction::PlayTrack),
        Just(PlayerAction::PlayNext),
        Just(PlayerAction::PlayPrevious),
        Just(PlayerAction::ToggleShuffle),
        Just(PlayerAction::CycleRepeat),
    ]
}

fn assert_invariants(state: &PlaybackState) -> Result<(), TestCaseError> {
    if state.queue.is_empty() {
        prop_assert!(state.current_track_id.is_none(), "empty queue with a current track");
        prop_assert!(!state.is_playing, "empty queue while playing");
    }
    if let Some(id) = &state.current_track_id {
        prop_assert!(state.contains(id), "current track {} not in queue", id);
    }
    prop_assert!((0.0..=1.0).contains(&state.volume));
    prop_assert!(state.position_seconds.is_finite());
    Ok(())
}

// ===== Property Tests =====

proptest! {
    /// Property: invariants hold after every transition
    #[test]
    fn invariants_hold_after_every_action(
        actions in prop::collection::vec(arbitrary_action(), 1..60),
        seed in any::<u64>(),
    ) {
        let mut store = PlayerStore::with_rng(PlaybackState::new(), StdRng::seed_from_u64(seed));
        for action in actions {
            store.apply(action);
            assert_invariants(store.state())?;
        }
    }

    /// Property: position is zero whenever the current track changes
    #[test]
    fn position_resets_on_track_change(
        actions in prop::collection::vec(arbitrary_action(), 1..60),
        seed in any::<u64>(),
    ) {
        let mut store = PlayerStore::with_rng(PlaybackState::new(), StdRng::seed_from_u64(seed));
        for action in actions {
            if let Some(previous) = store.apply(action) {
                if previous.current_track_id != store.state().current_track_id {
                    prop_assert_eq!(store.state().position_seconds, 0.0);
                }
            }
        }
    }

    /// Property: user seeks never leave `[0, duration]` once duration is known
    #[test]
    fn seek_stays_within_duration(
        entry in arbitrary_entry(),
        target in -1000.0f64..1000.0,
    ) {
        let duration = f64::from(entry.duration_seconds);
        let mut store = PlayerStore::default();
        store.apply(PlayerAction::Enqueue(entry));
        store.apply(PlayerAction::Seek(target));

        let position = store.state().position_seconds;
        prop_assert!(position >= 0.0);
        if duration > 0.0 {
            prop_assert!(position <= duration);
        }
    }

    /// Property: reorder is a permutation of the queue
    #[test]
    fn reorder_preserves_entries(
        entries in prop::collection::vec(arbitrary_entry(), 1..10),
        from in 0usize..12,
        to in 0usize..12,
    ) {
        let mut store = PlayerStore::default();
        store.apply(PlayerAction::SetQueue(entries));
        let mut before: Vec<_> = store.state().queue.iter().map(|e| e.id.clone()).collect();

        store.apply(PlayerAction::Reorder { from, to });
        let mut after: Vec<_> = store.state().queue.iter().map(|e| e.id.clone()).collect();

        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    /// Property: without shuffle and repeat, next then previous returns to the start
    #[test]
    fn next_then_previous_is_identity_in_the_middle(len in 3usize..10, start in 0usize..8) {
        let start = start % (len - 1);
        let entries: Vec<_> = (0..len)
            .map(|i| QueueEntry::new(format!("t{i}"), format!("Track {i}"), "Artist"))
            .collect();
        let mut store = PlayerStore::default();
        store.apply(PlayerAction::SetQueue(entries.clone()));
        store.apply(PlayerAction::PlayTrack(entries[start].clone()));

        store.apply(PlayerAction::PlayNext);
        store.apply(PlayerAction::PlayPrevious);

        prop_assert_eq!(store.state().current_track_id.as_deref(), Some(entries[start].id.as_str()));
    }

    /// Property: three repeat cycles are the identity
    #[test]
    fn repeat_cycle_has_period_three(cycles in 0usize..12) {
        let mut store = PlayerStore::default();
        let initial = store.state().repeat;
        for _ in 0..cycles * 3 {
            store.apply(PlayerAction::CycleRepeat);
        }
        prop_assert_eq!(store.state().repeat, initial);
    }
}
