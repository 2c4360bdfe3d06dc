//! Board module - manages the playfield
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Collision rules:
//! - columns < 0 or > 9 and rows >= 20 are permanently blocked
//! - rows -4..-1 form a hidden buffer that is always empty
//! - anything above the buffer is blocked

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::shapes::PieceShape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if outside the visible field
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if outside the visible field
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a single mino may sit at (x, y).
    #[inline]
    pub fn cell_free(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        if y < 0 {
            return y >= -(HIDDEN_ROWS as i8);
        }
        matches!(self.get(x, y), Some(None))
    }

    /// Corner test used by T-spin detection: walls and floor count as filled,
    /// anything above row 0 counts as empty.
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return true;
        }
        if y < 0 {
            return false;
        }
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check whether a shape placed with its box origin at (x, y) collides.
    pub fn is_valid(&self, shape: &PieceShape, x: i8, y: i8) -> bool {
        shape
            .iter()
            .all(|&(dx, dy)| self.cell_free(x + dx, y + dy))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Write the piece's minos into the board.
    ///
    /// Minos in the hidden buffer are discarded; the caller decides whether that
    /// ends the game.
    ///
    /// # Panics
    ///
    /// Panics if the piece collides with the board. Placing a colliding piece is a
    /// controller bug, never a player-reachable state.
    pub fn place(&mut self, piece: &Piece) {
        let shape = piece.shape();
        assert!(
            self.is_valid(&shape, piece.x, piece.y),
            "invalid placement: {:?} {:?} at ({}, {}) collides with the board",
            piece.kind,
            piece.rotation,
            piece.x,
            piece.y
        );

        for (x, y) in piece.cells() {
            self.set(x, y, Some(piece.kind));
        }
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    /// Uses a two-pointer algorithm with zero-allocation
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, 4> {
        let mut cleared_rows = ArrayVec::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        // Scan from bottom to top
        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                // A single piece spans at most four rows.
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows
    }

    /// True when no visible cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Number of occupied cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Write the board as small integer codes: 0 empty, 1..=7 piece kind.
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, code) in row.iter_mut().enumerate() {
                *code = match self.cells[y * width + x] {
                    Some(kind) => kind.index() as u8 + 1,
                    None => 0,
                };
            }
        }
    }

    /// Build a board from text rows, aligned to the bottom of the field.
    ///
    /// `.` and space are empty; a piece letter fills the cell with that kind; any
    /// other character fills the cell as garbage tagged `I`.
    ///
    /// # Examples
    ///
    /// ```
    /// use srs_tetris_core::Board;
    ///
    /// let board = Board::from_ascii(&["XXXXXXXXX."]);
    /// assert!(board.is_blocked(0, 19));
    /// assert!(!board.is_blocked(9, 19));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics when given more than 20 rows or a row wider than 10 cells.
    pub fn from_ascii(rows: &[&str]) -> Self {
        assert!(rows.len() <= BOARD_HEIGHT as usize, "too many rows");
        let mut board = Self::new();
        let top = BOARD_HEIGHT as usize - rows.len();
        for (i, row) in rows.iter().enumerate() {
            assert!(row.chars().count() <= BOARD_WIDTH as usize, "row too wide: {row:?}");
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' | ' ' => None,
                    other => Some(PieceKind::from_str(&other.to_string()).unwrap_or(PieceKind::I)),
                };
                board.set(x as i8, (top + i) as i8, cell);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_cell_free_bounds() {
        let board = Board::new();
        assert!(board.cell_free(0, 0));
        assert!(board.cell_free(9, 19));
        assert!(!board.cell_free(-1, 5));
        assert!(!board.cell_free(10, 5));
        assert!(!board.cell_free(4, 20));
        // Hidden buffer.
        assert!(board.cell_free(4, -1));
        assert!(board.cell_free(4, -4));
        assert!(!board.cell_free(4, -5));
    }

    #[test]
    fn test_is_blocked_treats_above_field_as_empty() {
        let board = Board::new();
        assert!(!board.is_blocked(3, -1));
        assert!(board.is_blocked(-1, 3));
        assert!(board.is_blocked(3, 20));
        assert!(!board.is_blocked(3, 3));
    }

    #[test]
    fn test_place_writes_cells() {
        let mut board = Board::new();
        let piece = Piece {
            kind: PieceKind::T,
            rotation: Rotation::Spawn,
            x: 3,
            y: 18,
        };
        board.place(&piece);
        assert_eq!(board.get(4, 18), Some(Some(PieceKind::T)));
        assert_eq!(board.get(3, 19), Some(Some(PieceKind::T)));
        assert_eq!(board.get(4, 19), Some(Some(PieceKind::T)));
        assert_eq!(board.get(5, 19), Some(Some(PieceKind::T)));
        assert_eq!(board.filled_count(), 4);
    }

    #[test]
    #[should_panic(expected = "invalid placement")]
    fn test_place_panics_on_collision() {
        let mut board = Board::from_ascii(&["XXXXXXXXXX"]);
        let piece = Piece {
            kind: PieceKind::O,
            rotation: Rotation::Spawn,
            x: 0,
            y: 18,
        };
        board.place(&piece);
    }

    #[test]
    fn test_clear_full_rows_shifts_down() {
        let mut board = Board::from_ascii(&[
            "..T.......",
            "XXXXXXXXXX",
            "X.XXXXXXXX",
            "XXXXXXXXXX",
        ]);
        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[19, 17]);
        assert_eq!(board.get(2, 18), Some(Some(PieceKind::T)));
        assert_eq!(board.get(1, 19), Some(None));
        assert_eq!(board.get(0, 19), Some(Some(PieceKind::I)));
        for y in 0..BOARD_HEIGHT as usize {
            assert!(!board.is_row_full(y));
        }
    }

    #[test]
    fn test_from_ascii_bottom_aligned() {
        let board = Board::from_ascii(&["L........."]);
        assert_eq!(board.get(0, 19), Some(Some(PieceKind::L)));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_is_empty_after_full_clear() {
        let mut board = Board::from_ascii(&["XXXXXXXXXX", "XXXXXXXXXX"]);
        assert!(!board.is_empty());
        assert_eq!(board.clear_full_rows().len(), 2);
        assert!(board.is_empty());
    }

    #[test]
    fn test_write_u8_grid() {
        let board = Board::from_ascii(&["IOTSZJL..."]);
        let mut grid = [[0u8; 10]; 20];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[19], [1, 2, 3, 4, 5, 6, 7, 0, 0, 0]);
        assert_eq!(grid[0], [0; 10]);
    }
}
