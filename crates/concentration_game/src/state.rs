//! Game state snapshot and its read-only queries.

use crate::pairing::PairOutcome;
use crate::tile::{Board, TileDescriptor};
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::Display as StrumDisplay;

/// Delay between completing a pair and resolving it.
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(500);

/// Visual state of a single tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, StrumDisplay,
)]
pub enum TileState {
    /// Face down.
    #[default]
    Hidden,
    /// Face up, waiting in the selection slot for a partner.
    Selected,
    /// Face up as half of a completed pair whose commit has not fired yet.
    Revealed,
    /// Matched; face up for the rest of the session.
    Locked,
}

impl TileState {
    /// Face currently shown.
    pub fn is_flipped(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Permanently matched.
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }

    /// Face down and clickable.
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// The first tile of an attempt, waiting for its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Selection {
    /// Board index of the selected tile.
    pub index: usize,
    /// Its tile number, captured at click time.
    pub tile_number: i64,
}

/// Session-level phase derived from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay)]
pub enum SessionPhase {
    /// No board has arrived yet.
    Loading,
    /// Board loaded and nothing waiting to resolve.
    Ready,
    /// At least one completed pair is waiting for its delayed commit.
    /// Clicks on other hidden tiles are still accepted.
    Resolving,
}

/// A completed pair whose outcome is applied after the commit delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct PendingCommit {
    /// Board generation the pair belongs to.
    pub generation: u64,
    /// Board indices, first click then second click.
    pub pair: [usize; 2],
    /// Pairing rule result decided at click time.
    pub outcome: PairOutcome,
}

/// Broken state invariant.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invariant violation: {}", message)]
pub struct InvariantViolation {
    /// What was found.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Complete game snapshot.
///
/// Transitions consume the snapshot and return the next one (see
/// [`GameState::apply`]), so a caller that wants to keep history can
/// simply clone before applying an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) tiles: Vec<TileState>,
    pub(crate) selection: Option<Selection>,
    pub(crate) attempts: u32,
    pub(crate) pending: Vec<PendingCommit>,
    pub(crate) generation: u64,
    pub(crate) version: u64,
    pub(crate) commit_delay: Duration,
}

impl GameState {
    /// Creates an empty session in the `Loading` phase.
    pub fn new(commit_delay: Duration) -> Self {
        Self {
            board: Board::default(),
            tiles: Vec::new(),
            selection: None,
            attempts: 0,
            pending: Vec::new(),
            generation: 0,
            version: 0,
            commit_delay,
        }
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Per-tile states aligned with [`GameState::board`].
    pub fn tiles(&self) -> &[TileState] {
        &self.tiles
    }

    /// State of the tile at `index`.
    pub fn tile_state(&self, index: usize) -> Option<TileState> {
        self.tiles.get(index).copied()
    }

    /// Descriptor of the tile at `index`.
    pub fn tile(&self, index: usize) -> Option<&TileDescriptor> {
        self.board.get(index)
    }

    /// The tile waiting for a partner, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Number of hidden tiles flipped this session.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Commits scheduled but not yet applied.
    pub fn pending(&self) -> &[PendingCommit] {
        &self.pending
    }

    /// Increments on every board load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Increments on every state change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Delay applied to each completed pair.
    pub fn commit_delay(&self) -> Duration {
        self.commit_delay
    }

    /// Session phase derived from the snapshot.
    pub fn phase(&self) -> SessionPhase {
        if self.board.is_empty() {
            SessionPhase::Loading
        } else if self.pending.is_empty() {
            SessionPhase::Ready
        } else {
            SessionPhase::Resolving
        }
    }

    /// Returns true once every tile on a loaded board is locked.
    pub fn is_complete(&self) -> bool {
        !self.tiles.is_empty() && self.tiles.iter().all(|t| t.is_locked())
    }

    /// Number of tiles currently locked.
    pub fn locked_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_locked()).count()
    }

    /// Verifies the structural invariants of the snapshot.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.tiles.len() != self.board.len() {
            return Err(InvariantViolation::new(format!(
                "{} tile states for {} tiles",
                self.tiles.len(),
                self.board.len()
            )));
        }

        let selected: Vec<usize> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == TileState::Selected)
            .map(|(i, _)| i)
            .collect();

        match (self.selection, selected.as_slice()) {
            (None, []) => {}
            (Some(sel), [index]) if sel.index == *index => {
                let number = self.board.get(sel.index).map(|t| t.tile_number);
                if number != Some(sel.tile_number) {
                    return Err(InvariantViolation::new(format!(
                        "selection at {} records tile {} but board has {:?}",
                        sel.index, sel.tile_number, number
                    )));
                }
            }
            (sel, found) => {
                return Err(InvariantViolation::new(format!(
                    "selection slot {:?} disagrees with selected tiles {:?}",
                    sel, found
                )));
            }
        }

        for commit in self.pending.iter().filter(|c| c.generation == self.generation) {
            for index in commit.pair {
                if self.tile_state(index) != Some(TileState::Revealed) {
                    return Err(InvariantViolation::new(format!(
                        "pending pair {:?} has tile {} in state {:?}",
                        commit.pair,
                        index,
                        self.tile_state(index)
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_DELAY)
    }
}
