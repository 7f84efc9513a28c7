//! Application state for the terminal front end.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use tracing::{debug, info};

use super::input::{Target, hit_test, move_cursor};
use super::ui::{self, ScreenLayout};
use crate::assets::FaceImages;
use crate::runtime::GameRuntime;

/// Main application state.
pub struct App {
    runtime: GameRuntime,
    faces: FaceImages,
    cursor: usize,
    columns: usize,
    layout: ScreenLayout,
    should_quit: bool,
}

impl App {
    /// Creates the application around a runtime that has not started yet.
    pub fn new(runtime: GameRuntime, columns: usize) -> Self {
        Self {
            runtime,
            faces: FaceImages::new(),
            cursor: 0,
            columns,
            layout: ScreenLayout::default(),
            should_quit: false,
        }
    }

    /// Mounts the screen: kicks off the first fetch.
    pub fn start(&mut self) {
        info!("Mounting game screen");
        self.runtime.start();
    }

    /// The game runtime.
    pub fn runtime(&self) -> &GameRuntime {
        &self.runtime
    }

    /// Board index under the keyboard cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true once the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Applies finished background work: fetched boards, due commits and
    /// image probes.
    pub fn tick(&mut self) {
        self.runtime.drain();

        let state = self.runtime.state();
        if !state.board().is_empty() {
            self.faces.probe_board(
                state.generation(),
                state.board().tiles().iter().map(|t| t.file_name.as_str()),
            );
            self.cursor = self.cursor.min(state.board().len() - 1);
        }
        self.faces.drain();
    }

    /// Renders the current frame.
    pub fn draw(&mut self, frame: &mut Frame) {
        self.layout = ui::draw(
            frame,
            self.runtime.state(),
            &self.faces,
            self.cursor,
            self.columns,
        );
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("User quit");
                self.should_quit = true;
            }
            KeyCode::Char('r') => self.reset(),
            KeyCode::Enter | KeyCode::Char(' ') => self.click(self.cursor),
            code => {
                let len = self.runtime.state().board().len();
                self.cursor = move_cursor(self.cursor, code, len, self.columns);
            }
        }
    }

    /// Handles a mouse event; only left-button presses act.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        match hit_test(&self.layout, mouse.column, mouse.row) {
            Some(Target::Tile(index)) => {
                self.cursor = index;
                self.click(index);
            }
            Some(Target::Reset) => self.reset(),
            None => debug!(column = mouse.column, row = mouse.row, "Click on empty space"),
        }
    }

    fn click(&mut self, index: usize) {
        self.runtime.click(index);
    }

    fn reset(&mut self) {
        info!("Reset requested");
        self.runtime.reset();
    }
}
