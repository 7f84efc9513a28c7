//! Stateless rendering of the tile grid.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::assets::{FaceImage, FaceImages};
use concentration_game::{GameState, TileState};

/// Placeholder shown until the first board arrives.
pub const LOADING_TEXT: &str = "Loading tiles...";

/// Label of the reset control.
pub const RESET_LABEL: &str = "Reset";

const CELL_WIDTH: u16 = 16;
const CELL_HEIGHT: u16 = 3;
const CELL_GAP: u16 = 1;

/// Screen regions of the last frame, kept for mouse hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    /// One rectangle per board index. Empty while loading.
    pub cells: Vec<Rect>,
    /// The reset control.
    pub reset: Rect,
}

/// Renders the whole screen and returns where everything landed.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    faces: &FaceImages,
    cursor: usize,
    columns: usize,
) -> ScreenLayout {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(CELL_HEIGHT),
            Constraint::Length(3), // Click count
            Constraint::Length(3), // Reset
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = if state.is_complete() {
        format!("All pairs found in {} clicks!", state.attempts())
    } else {
        "Concentration".to_string()
    };
    let title = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let cells = if state.board().is_empty() {
        let loading = Paragraph::new(LOADING_TEXT)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(loading, center_rect(chunks[1], 30, 1));
        Vec::new()
    } else {
        let cells = grid_cells(chunks[1], state.board().len(), columns);
        for (index, cell) in cells.iter().enumerate() {
            draw_cell(frame, *cell, state, faces, index, index == cursor);
        }
        cells
    };

    let counter = Paragraph::new(format!("Click Count: {}", state.attempts()))
        .style(Style::default().fg(Color::White).bg(Color::Magenta))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(counter, center_rect(chunks[2], 24, 3));

    let reset = center_rect(chunks[3], 24, 3);
    let reset_button = Paragraph::new(RESET_LABEL)
        .style(Style::default().fg(Color::White).bg(Color::Blue))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(reset_button, reset);

    let help = Paragraph::new("click a tile · arrows + enter · r reset · q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);

    ScreenLayout { cells, reset }
}

/// Places `count` cells in rows of `columns`, centred in `area`. Cells that
/// fall outside `area` are clipped to it.
pub fn grid_cells(area: Rect, count: usize, columns: usize) -> Vec<Rect> {
    let columns = columns.max(1).min(count.max(1));
    let rows = count.div_ceil(columns);

    let width = (columns as u16)
        .saturating_mul(CELL_WIDTH + CELL_GAP)
        .saturating_sub(CELL_GAP);
    let height = (rows as u16).saturating_mul(CELL_HEIGHT);
    let grid = center_rect(area, width, height);

    (0..count)
        .map(|index| {
            let col = (index % columns) as u16;
            let row = (index / columns) as u16;
            let cell = Rect::new(
                grid.x.saturating_add(col.saturating_mul(CELL_WIDTH + CELL_GAP)),
                grid.y.saturating_add(row.saturating_mul(CELL_HEIGHT)),
                CELL_WIDTH,
                CELL_HEIGHT,
            );
            cell.intersection(area)
        })
        .collect()
}

fn draw_cell(
    frame: &mut Frame,
    area: Rect,
    state: &GameState,
    faces: &FaceImages,
    index: usize,
    under_cursor: bool,
) {
    let (Some(tile), Some(tile_state)) = (state.tile(index), state.tile_state(index)) else {
        return;
    };

    let (label, base_style) = match tile_state {
        TileState::Hidden => (String::new(), Style::default().bg(Color::Magenta)),
        flipped => {
            let label = match faces.get(&tile.file_name) {
                FaceImage::Ready(_) => face_label(&tile.file_name),
                FaceImage::Pending => "…".to_string(),
                FaceImage::Missing => String::new(),
            };
            let style = match flipped {
                TileState::Locked => Style::default().fg(Color::Black).bg(Color::Green),
                TileState::Revealed => Style::default().fg(Color::Black).bg(Color::Cyan),
                _ => Style::default().fg(Color::Black).bg(Color::Gray),
            };
            (label, style)
        }
    };

    let border_style = if under_cursor {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(Line::from(label))
        .style(base_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border_style));
    frame.render_widget(paragraph, area);
}

/// Short name shown on a face: the file name without directories or
/// extension.
pub fn face_label(file_name: &str) -> String {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
    stem.to_string()
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
