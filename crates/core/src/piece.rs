//! Active piece - kind, rotation, and the position of its 4x4 box

use crate::board::Board;
use crate::shapes::{get_shape, spawn_position, PieceShape};
use crate::types::{PieceKind, Rotation};

/// Active falling piece
///
/// `(x, y)` is the top-left cell of the piece's 4x4 bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a new piece at its spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::Spawn,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute playfield cells (column, row) occupied by the piece.
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Cells the piece would occupy in `rotation` without moving its box.
    pub fn rotated_cells(&self, rotation: Rotation) -> [(i8, i8); 4] {
        get_shape(self.kind, rotation).map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Same piece shifted by (dx, dy).
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Check if all minos are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid(&self.shape(), self.x, self.y)
    }

    /// Whether moving one row down would collide.
    pub fn is_grounded(&self, board: &Board) -> bool {
        !board.is_valid(&self.shape(), self.x, self.y + 1)
    }

    /// Resting `y` after an unlimited soft drop.
    pub fn ghost_drop(&self, board: &Board) -> i8 {
        let shape = self.shape();
        let mut y = self.y;
        while board.is_valid(&shape, self.x, y + 1) {
            y += 1;
        }
        y
    }

    /// True if any mino sits above the visible field.
    pub fn is_above_field(&self) -> bool {
        self.cells().iter().any(|&(_, y)| y < 0)
    }
}
