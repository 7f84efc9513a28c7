//! Event-driven transitions.
//!
//! Every event maps the current snapshot to the next snapshot plus the
//! effects the caller must carry out. Nothing here sleeps, spawns, or
//! talks to the network.

use crate::pairing::PairOutcome;
use crate::state::{GameState, PendingCommit, Selection, TileState};
use crate::tile::{Board, TileDescriptor};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Request a fresh board. Used on mount and by the reset control.
    Reset,
    /// A shuffled board arrived from the tile source.
    BoardFetched(Vec<TileDescriptor>),
    /// The tile source failed.
    FetchFailed(String),
    /// The user clicked the tile at this board index.
    Click(usize),
    /// A scheduled commit's delay elapsed.
    CommitDue(PendingCommit),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and shuffle a new board, then deliver
    /// [`GameEvent::BoardFetched`] or [`GameEvent::FetchFailed`].
    FetchBoard,
    /// Deliver [`GameEvent::CommitDue`] for `commit` after `delay`.
    ScheduleCommit {
        /// The pair to resolve.
        commit: PendingCommit,
        /// How long to wait.
        delay: Duration,
    },
    /// Drop every scheduled commit from a generation older than this one.
    CancelCommits {
        /// First generation that stays scheduled.
        before_generation: u64,
    },
}

/// Next snapshot plus the effects to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The new snapshot.
    pub state: GameState,
    /// Effects in the order they should run.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: GameState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn changed(mut state: GameState, effects: Vec<Effect>) -> Self {
        state.version += 1;
        debug_assert!(
            state.check_invariants().is_ok(),
            "{:?}",
            state.check_invariants()
        );
        Self { state, effects }
    }
}

impl GameState {
    /// Applies one event.
    #[instrument(skip(self), fields(version = self.version, generation = self.generation))]
    pub fn apply(self, event: GameEvent) -> Transition {
        match event {
            GameEvent::Reset => self.reset(),
            GameEvent::BoardFetched(tiles) => self.load_board(tiles),
            GameEvent::FetchFailed(reason) => self.fetch_failed(reason),
            GameEvent::Click(index) => self.click(index),
            GameEvent::CommitDue(commit) => self.commit(commit),
        }
    }

    /// Asks for a fresh board. The current board stays in place until the
    /// new one arrives.
    #[instrument(skip(self))]
    pub fn reset(self) -> Transition {
        info!("Requesting a fresh board");
        Transition {
            state: self,
            effects: vec![Effect::FetchBoard],
        }
    }

    /// Installs a new board with every tile hidden, an empty selection
    /// slot and a zero attempt counter.
    #[instrument(skip(self, tiles), fields(tiles = tiles.len()))]
    pub fn load_board(mut self, tiles: Vec<TileDescriptor>) -> Transition {
        self.tiles = vec![TileState::Hidden; tiles.len()];
        self.board = Board::new(tiles);
        self.selection = None;
        self.attempts = 0;
        self.pending.clear();
        self.generation += 1;

        info!(generation = self.generation, "Board loaded");
        let effects = vec![Effect::CancelCommits {
            before_generation: self.generation,
        }];
        Transition::changed(self, effects)
    }

    /// Records a failed fetch. The snapshot is left as it was.
    #[instrument(skip(self))]
    pub fn fetch_failed(self, reason: String) -> Transition {
        warn!(%reason, phase = %self.phase(), "Board fetch failed, keeping current state");
        Transition::unchanged(self)
    }

    /// Handles a click on the tile at `index`.
    ///
    /// Clicks on flipped or locked tiles, out-of-range indices and clicks
    /// before a board exists are ignored.
    #[instrument(skip(self))]
    pub fn click(mut self, index: usize) -> Transition {
        let Some(tile_number) = self.board.get(index).map(|t| t.tile_number) else {
            debug!(board_len = self.board.len(), "Click outside the board ignored");
            return Transition::unchanged(self);
        };

        if !self.tiles[index].is_hidden() {
            debug!(state = %self.tiles[index], "Click on a face-up tile ignored");
            return Transition::unchanged(self);
        }

        self.attempts += 1;

        let Some(first) = self.selection.take() else {
            self.tiles[index] = TileState::Selected;
            self.selection = Some(Selection::new(index, tile_number));
            debug!(tile_number, attempts = self.attempts, "First tile selected");
            return Transition::changed(self, Vec::new());
        };

        let outcome = PairOutcome::evaluate(first.tile_number, tile_number);
        self.tiles[first.index] = TileState::Revealed;
        self.tiles[index] = TileState::Revealed;

        let commit = PendingCommit::new(self.generation, [first.index, index], outcome);
        self.pending.push(commit);

        info!(
            first = first.tile_number,
            second = tile_number,
            %outcome,
            attempts = self.attempts,
            "Pair completed"
        );

        let effects = vec![Effect::ScheduleCommit {
            commit,
            delay: self.commit_delay,
        }];
        Transition::changed(self, effects)
    }

    /// Resolves a completed pair: matched tiles lock, mismatched tiles turn
    /// back over. Commits from an earlier board are ignored.
    #[instrument(skip(self))]
    pub fn commit(mut self, commit: PendingCommit) -> Transition {
        if commit.generation != self.generation {
            debug!(
                commit_generation = commit.generation,
                "Stale commit from a previous board ignored"
            );
            return Transition::unchanged(self);
        }

        let Some(position) = self.pending.iter().position(|c| *c == commit) else {
            warn!("Commit was not pending, ignoring");
            return Transition::unchanged(self);
        };
        self.pending.remove(position);

        let resolved = if commit.outcome.is_match() {
            TileState::Locked
        } else {
            TileState::Hidden
        };
        for index in commit.pair {
            self.tiles[index] = resolved;
        }

        debug!(outcome = %commit.outcome, locked = self.locked_count(), "Pair resolved");
        if self.is_complete() {
            info!(attempts = self.attempts, "All pairs found");
        }
        Transition::changed(self, Vec::new())
    }
}
