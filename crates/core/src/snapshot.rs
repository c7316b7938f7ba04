use serde::Serialize;

use crate::field::Field;
use crate::pieces::Piece;
use crate::types::RunState;

/// Read-only copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub field: Field,
    pub active: Option<Piece>,
    pub next: Option<Piece>,
    pub score: u32,
    pub breaks: u32,
    pub run_state: RunState,
}

impl GameSnapshot {
    /// Snapshot of an idle engine with an empty field
    pub fn empty(cols: u16, rows: u16) -> Self {
        Self {
            field: Field::new(cols, rows),
            active: None,
            next: None,
            score: 0,
            breaks: 0,
            run_state: RunState::Idle,
        }
    }

    pub fn cols(&self) -> u16 {
        self.field.cols()
    }

    pub fn rows(&self) -> u16 {
        self.field.rows()
    }

    pub fn playable(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn game_over(&self) -> bool {
        self.run_state == RunState::GameOver
    }

    pub fn paused(&self) -> bool {
        self.run_state == RunState::Paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        use crate::types::{DEFAULT_COLS, DEFAULT_ROWS};
        Self::empty(DEFAULT_COLS, DEFAULT_ROWS)
    }
}
