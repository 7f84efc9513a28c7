//! Tests for the game state machine transitions.

use concentration_game::{
    Effect, GameEvent, GameState, PairOutcome, PendingCommit, SessionPhase, TileDescriptor,
    TileState, Transition,
};
use std::time::Duration;

fn tiles(numbers: &[i64]) -> Vec<TileDescriptor> {
    numbers
        .iter()
        .map(|n| TileDescriptor::new(*n, format!("tile_image_{n}.png")))
        .collect()
}

fn loaded(numbers: &[i64]) -> GameState {
    GameState::default()
        .apply(GameEvent::BoardFetched(tiles(numbers)))
        .state
}

fn scheduled(transition: &Transition) -> PendingCommit {
    match transition.effects.as_slice() {
        [Effect::ScheduleCommit { commit, .. }] => *commit,
        other => panic!("expected one scheduled commit, got {other:?}"),
    }
}

#[test]
fn test_new_session_is_loading() {
    let state = GameState::default();
    assert_eq!(state.phase(), SessionPhase::Loading);
    assert!(state.board().is_empty());
    assert_eq!(state.attempts(), 0);
    assert_eq!(state.commit_delay(), Duration::from_millis(500));
}

#[test]
fn test_load_board_hides_every_tile() {
    for n in [1usize, 2, 4, 16] {
        let numbers: Vec<i64> = (1..=n as i64).collect();
        let state = loaded(&numbers);

        assert_eq!(state.board().len(), n);
        assert_eq!(state.tiles().len(), n);
        assert!(state.tiles().iter().all(|t| *t == TileState::Hidden));
        assert_eq!(state.selection(), None);
        assert_eq!(state.attempts(), 0);
        assert_eq!(state.phase(), SessionPhase::Ready);
        assert!(state.check_invariants().is_ok());
    }
}

#[test]
fn test_load_board_cancels_older_commits() {
    let step = GameState::default().apply(GameEvent::BoardFetched(tiles(&[1, 2])));
    assert_eq!(
        step.effects,
        vec![Effect::CancelCommits {
            before_generation: 1
        }]
    );
    assert_eq!(step.state.generation(), 1);
}

#[test]
fn test_reload_clears_progress() {
    let state = loaded(&[1, 2, 3, 4]);
    let state = state.apply(GameEvent::Click(0)).state;
    let state = state.apply(GameEvent::Click(2)).state;
    let state = state.apply(GameEvent::Click(3)).state;
    assert_eq!(state.attempts(), 3);

    let state = state.apply(GameEvent::BoardFetched(tiles(&[4, 3, 2, 1]))).state;
    assert_eq!(state.attempts(), 0);
    assert_eq!(state.selection(), None);
    assert!(state.pending().is_empty());
    assert!(state.tiles().iter().all(|t| t.is_hidden()));
    assert_eq!(state.generation(), 2);
}

#[test]
fn test_first_click_fills_selection_slot() {
    let state = loaded(&[5, 6, 7, 8]);
    let step = state.apply(GameEvent::Click(2));

    assert!(step.effects.is_empty());
    let state = step.state;
    assert_eq!(state.tile_state(2), Some(TileState::Selected));
    assert_eq!(state.selection().map(|s| (s.index, s.tile_number)), Some((2, 7)));
    assert_eq!(state.attempts(), 1);
}

#[test]
fn test_every_hidden_click_counts_once() {
    let mut state = loaded(&[1, 2, 3, 4, 5, 6]);
    for (clicks, index) in [0usize, 3, 1, 4, 2, 5].into_iter().enumerate() {
        state = state.apply(GameEvent::Click(index)).state;
        assert_eq!(state.attempts(), clicks as u32 + 1);
    }
}

#[test]
fn test_clicking_flipped_tile_changes_nothing() {
    let state = loaded(&[1, 2, 3, 4]);
    let state = state.apply(GameEvent::Click(1)).state;
    let before = state.clone();

    let step = state.apply(GameEvent::Click(1));
    assert!(step.effects.is_empty());
    assert_eq!(step.state, before);
}

#[test]
fn test_clicking_locked_tile_changes_nothing() {
    let state = loaded(&[1, 2, 3, 4]);
    let state = state.apply(GameEvent::Click(0)).state;
    let step = state.apply(GameEvent::Click(1));
    let commit = scheduled(&step);
    let state = step.state.apply(GameEvent::CommitDue(commit)).state;
    assert_eq!(state.tile_state(0), Some(TileState::Locked));

    let state = state.apply(GameEvent::Click(3)).state;
    let before = state.clone();
    let step = state.apply(GameEvent::Click(0));
    assert_eq!(step.state, before);
    assert_eq!(step.state.attempts(), 3);
    assert_eq!(step.state.selection().map(|s| s.index), Some(3));
}

#[test]
fn test_out_of_range_and_loading_clicks_are_ignored() {
    let state = GameState::default();
    let step = state.clone().apply(GameEvent::Click(0));
    assert_eq!(step.state, state);

    let state = loaded(&[1, 2]);
    let step = state.clone().apply(GameEvent::Click(2));
    assert_eq!(step.state, state);
}

#[test]
fn test_matching_pair_locks_after_commit() {
    let state = loaded(&[1, 2, 3, 4]);
    let state = state.apply(GameEvent::Click(0)).state;
    let step = state.apply(GameEvent::Click(1));

    let commit = scheduled(&step);
    assert_eq!(commit.pair, [0, 1]);
    assert_eq!(commit.outcome, PairOutcome::Matched);
    assert_eq!(
        step.effects,
        vec![Effect::ScheduleCommit {
            commit,
            delay: Duration::from_millis(500)
        }]
    );

    let state = step.state;
    assert_eq!(state.selection(), None);
    assert_eq!(state.attempts(), 2);
    assert_eq!(state.phase(), SessionPhase::Resolving);
    assert!(state.tile_state(0).is_some_and(|t| t.is_flipped()));
    assert!(state.tile_state(1).is_some_and(|t| t.is_flipped()));
    assert!(!state.tile_state(0).is_some_and(|t| t.is_locked()));

    let state = state.apply(GameEvent::CommitDue(commit)).state;
    assert_eq!(state.tile_state(0), Some(TileState::Locked));
    assert_eq!(state.tile_state(1), Some(TileState::Locked));
    assert!(state.tile_state(0).is_some_and(|t| t.is_flipped()));
    assert_eq!(state.phase(), SessionPhase::Ready);
}

#[test]
fn test_mismatch_flips_back_after_commit() {
    let state = loaded(&[1, 3]);
    let state = state.apply(GameEvent::Click(0)).state;
    let step = state.apply(GameEvent::Click(1));
    let commit = scheduled(&step);
    assert_eq!(commit.outcome, PairOutcome::Mismatched);

    let state = step.state;
    assert_eq!(state.selection(), None);
    assert_eq!(state.tile_state(0), Some(TileState::Revealed));
    assert_eq!(state.tile_state(1), Some(TileState::Revealed));

    let state = state.apply(GameEvent::CommitDue(commit)).state;
    assert_eq!(state.tile_state(0), Some(TileState::Hidden));
    assert_eq!(state.tile_state(1), Some(TileState::Hidden));
    assert_eq!(state.attempts(), 2);
}

#[test]
fn test_clicks_accepted_while_resolving() {
    let state = loaded(&[1, 3, 5, 6]);
    let state = state.apply(GameEvent::Click(0)).state;
    let step = state.apply(GameEvent::Click(1));
    let commit = scheduled(&step);

    let state = step.state.apply(GameEvent::Click(2)).state;
    assert_eq!(state.phase(), SessionPhase::Resolving);
    assert_eq!(state.tile_state(2), Some(TileState::Selected));

    let state = state.apply(GameEvent::CommitDue(commit)).state;
    assert_eq!(state.tile_state(2), Some(TileState::Selected));
    assert_eq!(state.selection().map(|s| s.index), Some(2));

    let step = state.apply(GameEvent::Click(3));
    assert_eq!(scheduled(&step).outcome, PairOutcome::Matched);
    assert_eq!(step.state.attempts(), 4);
}

#[test]
fn test_stale_commit_is_ignored() {
    let state = loaded(&[1, 2]);
    let state = state.apply(GameEvent::Click(0)).state;
    let step = state.apply(GameEvent::Click(1));
    let stale = scheduled(&step);

    let state = step.state.apply(GameEvent::BoardFetched(tiles(&[2, 1]))).state;
    let state = state.apply(GameEvent::Click(0)).state;
    let before = state.clone();

    let step = state.apply(GameEvent::CommitDue(stale));
    assert!(step.effects.is_empty());
    assert_eq!(step.state, before);
    assert_eq!(step.state.locked_count(), 0);
}

#[test]
fn test_duplicate_commit_is_ignored() {
    let state = loaded(&[1, 2]);
    let state = state.apply(GameEvent::Click(0)).state;
    let step = state.apply(GameEvent::Click(1));
    let commit = scheduled(&step);

    let state = step.state.apply(GameEvent::CommitDue(commit)).state;
    let version = state.version();
    let state = state.apply(GameEvent::CommitDue(commit)).state;
    assert_eq!(state.version(), version);
}

#[test]
fn test_reset_requests_fetch_and_keeps_board() {
    let state = loaded(&[1, 2]);
    let state = state.apply(GameEvent::Click(0)).state;
    let before = state.clone();

    let step = state.apply(GameEvent::Reset);
    assert_eq!(step.effects, vec![Effect::FetchBoard]);
    assert_eq!(step.state, before);
}

#[test]
fn test_fetch_failure_keeps_state() {
    let step = GameState::default().apply(GameEvent::FetchFailed("HTTP 500".into()));
    assert!(step.effects.is_empty());
    assert_eq!(step.state.phase(), SessionPhase::Loading);

    let state = loaded(&[1, 2]);
    let step = state.clone().apply(GameEvent::FetchFailed("timeout".into()));
    assert_eq!(step.state, state);
}

#[test]
fn test_version_tracks_changes_only() {
    let state = GameState::default();
    assert_eq!(state.version(), 0);
    let state = state.apply(GameEvent::BoardFetched(tiles(&[1, 2]))).state;
    assert_eq!(state.version(), 1);
    let state = state.apply(GameEvent::Click(5)).state;
    assert_eq!(state.version(), 1);
    let state = state.apply(GameEvent::Click(0)).state;
    assert_eq!(state.version(), 2);
}

#[test]
fn test_full_game_completes() {
    let numbers = [4, 1, 3, 2];
    let mut state = loaded(&numbers);

    for (a, b) in [(1usize, 3usize), (2, 0)] {
        state = state.apply(GameEvent::Click(a)).state;
        let step = state.apply(GameEvent::Click(b));
        let commit = scheduled(&step);
        state = step.state.apply(GameEvent::CommitDue(commit)).state;
    }

    assert!(state.is_complete());
    assert_eq!(state.locked_count(), 4);
    assert_eq!(state.attempts(), 4);
}
