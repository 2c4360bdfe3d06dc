//! SRS rotation with wall kicks
//!
//! Reference: https://tetris.wiki/SRS

use crate::board::Board;
use crate::piece::Piece;
use crate::shapes::{get_shape, kick_offsets};
use crate::types::{PieceKind, RotateDirection, Rotation};

/// Outcome of a successful rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotated {
    pub piece: Piece,
    /// Position in the kick list that fit; 0 means no kick.
    pub kick_index: u8,
    /// Offset that was applied, in playfield coordinates (y down).
    pub kick_offset: (i8, i8),
}

impl Rotated {
    pub fn kick(&self) -> Kick {
        Kick {
            index: self.kick_index,
            offset: self.kick_offset,
        }
    }
}

/// The kick a successful rotation used, as remembered for T-spin detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kick {
    pub index: u8,
    /// Playfield offset (y down).
    pub offset: (i8, i8),
}

/// Try to rotate a piece with wall kicks.
///
/// Returns `None` (and leaves the caller's piece alone) if all five kicks collide.
/// O pieces always succeed in place.
pub fn try_rotate(piece: &Piece, direction: RotateDirection, board: &Board) -> Option<Rotated> {
    let to = piece.rotation.rotate(direction);

    if piece.kind == PieceKind::O {
        return Some(Rotated {
            piece: Piece {
                rotation: to,
                ..*piece
            },
            kick_index: 0,
            kick_offset: (0, 0),
        });
    }

    let shape = get_shape(piece.kind, to);
    kick_offsets(piece.kind, piece.rotation, to)
        .iter()
        .enumerate()
        .find(|(_, &(dx, dy))| board.is_valid(&shape, piece.x + dx, piece.y + dy))
        .map(|(i, &(dx, dy))| Rotated {
            piece: Piece {
                rotation: to,
                x: piece.x + dx,
                y: piece.y + dy,
                ..*piece
            },
            kick_index: i as u8,
            kick_offset: (dx, dy),
        })
}
