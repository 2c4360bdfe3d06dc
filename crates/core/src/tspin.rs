//! T-spin classification (3-corner rule with front/back split).
//!
//! The four diagonal neighbours of the T's pivot are tested against the board.
//! Fewer than three blocked corners is not a spin. With three or more, the two
//! corners on the side the T points at decide between Proper and Mini, except that
//! a rotation which needed the final kick of its list is always Proper.

use crate::board::Board;
use crate::piece::Piece;
use crate::shapes::FINAL_KICK_INDEX;
use crate::types::{PieceKind, Rotation, TSpinKind};

/// Diagonal offsets from the pivot: NW, NE, SW, SE (y down).
const NW: (i8, i8) = (-1, -1);
const NE: (i8, i8) = (1, -1);
const SW: (i8, i8) = (-1, 1);
const SE: (i8, i8) = (1, 1);

fn front_corners(rotation: Rotation) -> [(i8, i8); 2] {
    match rotation {
        Rotation::Spawn => [NW, NE],
        Rotation::Right => [NE, SE],
        Rotation::Flip => [SW, SE],
        Rotation::Left => [NW, SW],
    }
}

/// Classify a T about to lock.
///
/// `last_kick_index` is the kick that produced the most recent successful rotation,
/// or `None` if the last successful action was not a rotation. Non-T pieces are
/// never spins.
pub fn classify(piece: &Piece, board: &Board, last_kick_index: Option<u8>) -> TSpinKind {
    let Some(kick_index) = last_kick_index else {
        return TSpinKind::None;
    };
    if piece.kind != PieceKind::T {
        return TSpinKind::None;
    }

    let (cx, cy) = (piece.x + 1, piece.y + 1);
    let blocked = |(dx, dy): (i8, i8)| board.is_blocked(cx + dx, cy + dy);

    let corners = [NW, NE, SW, SE]
        .into_iter()
        .filter(|&c| blocked(c))
        .count();
    if corners < 3 {
        return TSpinKind::None;
    }

    let front = front_corners(piece.rotation);
    if front.into_iter().all(blocked) || kick_index == FINAL_KICK_INDEX {
        TSpinKind::Proper
    } else {
        TSpinKind::Mini
    }
}
