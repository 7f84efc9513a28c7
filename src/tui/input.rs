//! Cursor movement and mouse hit-testing.

use crossterm::event::KeyCode;
use ratatui::layout::Position;

use super::ui::ScreenLayout;

/// What a mouse click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The tile at this board index.
    Tile(usize),
    /// The reset control.
    Reset,
}

/// Moves the cursor over a grid of `len` cells laid out in rows of
/// `columns`. Moves that would leave the grid keep the cursor in place.
pub fn move_cursor(cursor: usize, key: KeyCode, len: usize, columns: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let columns = columns.max(1);
    let col = cursor % columns;

    let next = match key {
        KeyCode::Right if col + 1 < columns => cursor + 1,
        KeyCode::Left if col > 0 => cursor - 1,
        KeyCode::Down => cursor + columns,
        KeyCode::Up => cursor.wrapping_sub(columns),
        _ => cursor,
    };

    if next < len { next } else { cursor.min(len - 1) }
}

/// Finds what lies under terminal cell `(column, row)`.
pub fn hit_test(layout: &ScreenLayout, column: u16, row: u16) -> Option<Target> {
    let position = Position::new(column, row);
    if let Some(index) = layout.cells.iter().position(|cell| cell.contains(position)) {
        return Some(Target::Tile(index));
    }
    layout.reset.contains(position).then_some(Target::Reset)
}
