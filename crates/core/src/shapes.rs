//! Shapes module - Tetromino bitmaps and SRS kick tables
//!
//! Every (kind, rotation) pair is a 4x4 bitmap packed into a `u16`, one nibble per
//! row with the top row in the high nibble and the leftmost column in the high bit
//! of each nibble. So `0x4E00` reads:
//!
//! ```text
//! .X..
//! XXX.
//! ....
//! ....
//! ```
//!
//! Kick tables are stored exactly as published by the guideline
//! (https://tetris.wiki/SRS), which measures y upward. The playfield measures y
//! downward, so [`kick_offsets`] flips the sign of every `dy` on the way out.

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin (column, row)
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// One kick list: five (dx, dy) offsets tried in order.
pub type KickList = [(i8, i8); 5];

/// Bitmaps indexed by `[PieceKind::index()][Rotation::index()]`.
pub const SHAPE_BITMAPS: [[u16; 4]; 7] = [
    // I
    [0x0F00, 0x2222, 0x00F0, 0x4444],
    // O
    [0x6600, 0x6600, 0x6600, 0x6600],
    // T
    [0x4E00, 0x4640, 0x0E40, 0x4C40],
    // S
    [0x6C00, 0x4620, 0x06C0, 0x8C40],
    // Z
    [0xC600, 0x2640, 0x0C60, 0x4C80],
    // J
    [0x8E00, 0x6440, 0x0E20, 0x44C0],
    // L
    [0x2E00, 0x4460, 0x0E80, 0xC440],
];

/// Unpack a bitmap into its four filled cells, row-major.
const fn decode(bitmap: u16) -> PieceShape {
    let mut out = [(0i8, 0i8); 4];
    let mut n = 0;
    let mut bit = 0;
    while bit < 16 {
        if bitmap & (0x8000 >> bit) != 0 {
            assert!(n < 4, "shape bitmap has more than four cells");
            out[n] = ((bit % 4) as i8, (bit / 4) as i8);
            n += 1;
        }
        bit += 1;
    }
    assert!(n == 4, "shape bitmap has fewer than four cells");
    out
}

const fn decode_all() -> [[PieceShape; 4]; 7] {
    let mut out = [[[(0i8, 0i8); 4]; 4]; 7];
    let mut k = 0;
    while k < 7 {
        let mut r = 0;
        while r < 4 {
            out[k][r] = decode(SHAPE_BITMAPS[k][r]);
            r += 1;
        }
        k += 1;
    }
    out
}

/// Decoded at compile time; a malformed bitmap fails the build.
static SHAPES: [[PieceShape; 4]; 7] = decode_all();

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind.index()][rotation.index() as usize]
}

/// JLSTZ kicks, guideline notation (y up), indexed by [`transition_index`].
pub const JLSTZ_KICKS: [KickList; 8] = [
    // 0->R
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // R->0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // R->2
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->R
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->L
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // L->2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // L->0
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0->L
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// I kicks, guideline notation (y up), indexed by [`transition_index`].
pub const I_KICKS: [KickList; 8] = [
    // 0->R
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // R->0
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // R->2
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->R
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->L
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // L->2
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // L->0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 0->L
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// O never kicks; rotation is an in-place no-op.
const O_KICKS: KickList = [(0, 0); 5];

/// Index of the final, largest-displacement entry of every kick list.
pub const FINAL_KICK_INDEX: u8 = 4;

/// Row of the kick tables for a `from -> to` transition.
///
/// Panics if `from` and `to` are not adjacent rotation states; the rotation engine
/// only ever asks for quarter turns.
pub fn transition_index(from: Rotation, to: Rotation) -> usize {
    match (from, to) {
        (Rotation::Spawn, Rotation::Right) => 0,
        (Rotation::Right, Rotation::Spawn) => 1,
        (Rotation::Right, Rotation::Flip) => 2,
        (Rotation::Flip, Rotation::Right) => 3,
        (Rotation::Flip, Rotation::Left) => 4,
        (Rotation::Left, Rotation::Flip) => 5,
        (Rotation::Left, Rotation::Spawn) => 6,
        (Rotation::Spawn, Rotation::Left) => 7,
        _ => panic!("no kick table for transition {from:?} -> {to:?}"),
    }
}

/// Guideline kick list for a transition, exactly as published (y up).
pub fn kick_table(kind: PieceKind, from: Rotation, to: Rotation) -> &'static KickList {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS[transition_index(from, to)],
        _ => &JLSTZ_KICKS[transition_index(from, to)],
    }
}

/// Kick offsets converted to playfield coordinates (y down).
pub fn kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> KickList {
    let mut out = *kick_table(kind, from, to);
    for (_, dy) in out.iter_mut() {
        *dy = -*dy;
    }
    out
}

/// Spawn position for new pieces (x, y)
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Spawn position for a specific kind. I spawns one row higher so its
/// horizontal bar sits on row 0.
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    match kind {
        PieceKind::I => (SPAWN_POSITION.0, SPAWN_POSITION.1 - 1),
        _ => SPAWN_POSITION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let shape = get_shape(kind, Rotation::from_index(r));
                for i in 0..4 {
                    for j in (i + 1)..4 {
                        assert_ne!(shape[i], shape[j], "{kind:?} rotation {r}");
                    }
                    assert!((0..4).contains(&shape[i].0));
                    assert!((0..4).contains(&shape[i].1));
                }
            }
        }
    }

    #[test]
    fn test_decode_matches_row_major_offsets() {
        assert_eq!(
            get_shape(PieceKind::T, Rotation::Spawn),
            [(1, 0), (0, 1), (1, 1), (2, 1)]
        );
        assert_eq!(
            get_shape(PieceKind::I, Rotation::Right),
            [(2, 0), (2, 1), (2, 2), (2, 3)]
        );
        assert_eq!(
            get_shape(PieceKind::Z, Rotation::Right),
            [(2, 0), (1, 1), (2, 1), (1, 2)]
        );
    }

    #[test]
    fn test_t_shapes_share_pivot() {
        for r in 0..4 {
            let shape = get_shape(PieceKind::T, Rotation::from_index(r));
            assert!(shape.contains(&(1, 1)));
        }
    }

    #[test]
    fn test_guideline_tables_are_verbatim() {
        assert_eq!(
            *kick_table(PieceKind::T, Rotation::Spawn, Rotation::Right),
            [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]
        );
        assert_eq!(
            *kick_table(PieceKind::J, Rotation::Right, Rotation::Spawn),
            [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]
        );
        assert_eq!(
            *kick_table(PieceKind::I, Rotation::Spawn, Rotation::Right),
            [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]
        );
    }

    #[test]
    fn test_kick_offsets_flip_y() {
        assert_eq!(
            kick_offsets(PieceKind::T, Rotation::Spawn, Rotation::Right),
            [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]
        );
    }

    #[test]
    fn test_reverse_transitions_negate() {
        let pairs = [
            (Rotation::Spawn, Rotation::Right),
            (Rotation::Right, Rotation::Flip),
            (Rotation::Flip, Rotation::Left),
            (Rotation::Left, Rotation::Spawn),
        ];
        for kind in [PieceKind::I, PieceKind::T] {
            for (a, b) in pairs {
                let forward = kick_table(kind, a, b);
                let back = kick_table(kind, b, a);
                for i in 0..5 {
                    assert_eq!(forward[i].0, -back[i].0);
                    assert_eq!(forward[i].1, -back[i].1);
                }
            }
        }
    }

    #[test]
    fn test_first_kick_is_identity() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let from = Rotation::from_index(r);
                assert_eq!(kick_table(kind, from, from.rotate_cw())[0], (0, 0));
                assert_eq!(kick_table(kind, from, from.rotate_ccw())[0], (0, 0));
            }
        }
    }

    #[test]
    fn test_spawn_positions() {
        assert_eq!(spawn_position(PieceKind::T), (3, 0));
        assert_eq!(spawn_position(PieceKind::I), (3, -1));
    }
}
