//! Pure tile-pairing game logic.
//!
//! The game is a state machine over an immutable snapshot. Each
//! [`GameEvent`] produces a [`Transition`]: the next [`GameState`] and the
//! [`Effect`]s (fetching a board, scheduling or cancelling a delayed commit)
//! that a runtime has to perform. No I/O, timers or threads live here.
//!
//! # Example
//!
//! ```
//! use concentration_game::{Effect, GameEvent, GameState, TileDescriptor, TileState};
//!
//! let state = GameState::default();
//! let tiles = vec![
//!     TileDescriptor::new(1, "tile_image_1.png"),
//!     TileDescriptor::new(2, "tile_image_2.png"),
//! ];
//! let state = state.apply(GameEvent::BoardFetched(tiles)).state;
//! let state = state.apply(GameEvent::Click(0)).state;
//! let step = state.apply(GameEvent::Click(1));
//!
//! let Effect::ScheduleCommit { commit, .. } = &step.effects[0] else {
//!     panic!("expected a scheduled commit");
//! };
//! let state = step.state.apply(GameEvent::CommitDue(*commit)).state;
//! assert_eq!(state.tile_state(0), Some(TileState::Locked));
//! assert_eq!(state.attempts(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod pairing;
mod shuffle;
mod state;
mod tile;
mod transition;

pub use pairing::{PairOutcome, is_pair};
pub use shuffle::shuffle;
pub use state::{
    DEFAULT_COMMIT_DELAY, GameState, InvariantViolation, PendingCommit, Selection, SessionPhase,
    TileState,
};
pub use tile::{Board, TileDescriptor};
pub use transition::{Effect, GameEvent, Transition};
