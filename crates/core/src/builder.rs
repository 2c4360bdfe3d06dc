//! Building games with a preset board or a forced piece order.
//!
//! ```
//! use srs_tetris_core::{Board, GameState};
//! use srs_tetris_core::types::PieceKind;
//!
//! let game = GameState::builder()
//!     .seed(42)
//!     .board(Board::from_ascii(&["XXXXXXXXX."]))
//!     .upcoming(&[PieceKind::I])
//!     .build()
//!     .unwrap();
//! assert_eq!(game.current_piece().unwrap().kind, PieceKind::I);
//! ```

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{GameError, SeedError};
use crate::game_state::GameState;
use crate::rng::Seed;
use crate::types::PieceKind;

/// Reusable template for new [`GameState`]s.
///
/// Setters take `&mut self` so one builder can be tweaked and built repeatedly.
#[derive(Debug, Clone, Default)]
pub struct GameBuilder {
    pub seed: u64,
    pub config: GameConfig,
    /// Starting stack; empty when `None`.
    pub board: Option<Board>,
    /// Pieces dealt before the seeded bags, first one spawns immediately.
    pub upcoming: Vec<PieceKind>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    /// Parse a decimal or `0x` hex seed.
    pub fn seed_str(&mut self, seed: &str) -> Result<&mut Self, SeedError> {
        let Seed(seed) = seed.parse()?;
        self.seed = seed;
        Ok(self)
    }

    pub fn config(&mut self, config: GameConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn board(&mut self, board: Board) -> &mut Self {
        self.board = Some(board);
        self
    }

    pub fn upcoming(&mut self, pieces: &[PieceKind]) -> &mut Self {
        self.upcoming = pieces.to_vec();
        self
    }

    /// Create a game from this template.
    ///
    /// Fails if the config is invalid or the starting board contains a full row.
    pub fn build(&self) -> Result<GameState, GameError> {
        self.config.validate()?;
        let board = self.board.clone().unwrap_or_default();
        if (0..board.height() as usize).any(|y| board.is_row_full(y)) {
            return Err(GameError::InvalidConfig(
                "starting board contains a full row",
            ));
        }
        Ok(GameState::from_parts(
            self.seed,
            self.config,
            board,
            &self.upcoming,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_is_reusable() {
        let mut builder = GameBuilder::new();
        builder.seed(9).upcoming(&[PieceKind::Z, PieceKind::O]);
        let a = builder.build().unwrap();
        let b = builder.build().unwrap();
        assert_eq!(a.current_piece(), b.current_piece());
        assert_eq!(a.current_piece().unwrap().kind, PieceKind::Z);
        assert_eq!(a.next_preview(), PieceKind::O);
    }

    #[test]
    fn test_long_upcoming_order_is_dealt_in_full() {
        let forced = [PieceKind::T; 8];
        let mut game = GameBuilder::new().seed(5).upcoming(&forced).build().unwrap();
        assert_eq!(game.next_queue(), [PieceKind::T; 5]);

        // First T is active; seven more are queued ahead of the first seeded bag.
        let mut reference = crate::rng::PieceQueue::new(5);
        let bag: Vec<_> = (0..7).map(|_| reference.draw()).collect();
        let queue = game.queue_mut();
        for _ in 0..7 {
            assert_eq!(queue.draw(), PieceKind::T);
        }
        let dealt: Vec<_> = (0..7).map(|_| queue.draw()).collect();
        assert_eq!(dealt, bag);
    }

    #[test]
    fn test_full_row_rejected() {
        let result = GameState::builder()
            .board(Board::from_ascii(&["XXXXXXXXXX"]))
            .build();
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_seed_str_matches_numeric_seed() {
        let mut builder = GameBuilder::new();
        builder.seed_str("0xff").unwrap();
        assert_eq!(builder.seed, 255);
        assert!(builder.seed_str("").is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GameState::builder()
            .config(GameConfig::default().with_gravity(10, 50, 50))
            .build();
        assert!(result.is_err());
    }
}
