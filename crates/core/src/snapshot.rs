//! Read-only copy of the observable game state.

use crate::piece::Piece;
use crate::types::{GameOverReason, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimersSnapshot {
    pub fall_ms: u32,
    pub lock_ms: u32,
    pub lock_resets: u8,
    pub on_ground: bool,
}

/// Board codes are 0 for empty and `PieceKind::index() + 1` for filled cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    pub next_queue: [PieceKind; 5],
    pub can_hold: bool,
    pub game_over: Option<GameOverReason>,
    pub pieces_locked: u32,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub back_to_back: bool,
    pub perfect_clears: u32,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        self.game_over.is_none()
    }

    /// Number of filled visible cells.
    pub fn filled_cells(&self) -> usize {
        self.board
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&code| code != 0)
            .count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            hold: None,
            next_queue: [PieceKind::I; 5],
            can_hold: true,
            game_over: None,
            pieces_locked: 0,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            back_to_back: false,
            perfect_clears: 0,
            timers: TimersSnapshot::default(),
        }
    }
}
