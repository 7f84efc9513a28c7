//! The pairing rule.
//!
//! Tiles pair up as odd/even neighbours: 1 with 2, 3 with 4, and so on.
//! The odd member must be the lower number of the two, whichever order
//! the tiles were clicked in.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Result of comparing the two tiles of a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PairOutcome {
    /// The tiles form a pair and will be locked.
    Matched,
    /// The tiles do not pair and will be turned back over.
    Mismatched,
}

impl PairOutcome {
    /// Evaluates the pairing rule for `first` (the selected tile) and
    /// `second` (the tile just clicked).
    pub fn evaluate(first: i64, second: i64) -> Self {
        if is_pair(first, second) {
            Self::Matched
        } else {
            Self::Mismatched
        }
    }

    /// Returns true for [`PairOutcome::Matched`].
    pub fn is_match(self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// Returns true when `first` and `second` are adjacent numbers whose lower
/// member is odd.
///
/// Equal numbers never pair.
pub fn is_pair(first: i64, second: i64) -> bool {
    let first_below = first.checked_add(1) == Some(second) && is_odd(first);
    let second_below = second.checked_add(1) == Some(first) && is_odd(second);
    first_below || second_below
}

fn is_odd(n: i64) -> bool {
    n % 2 != 0
}
