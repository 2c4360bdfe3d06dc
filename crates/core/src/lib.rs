//! Core game logic - a pure, deterministic guideline Tetris simulator
//!
//! This crate contains every game rule and all mutable game state. It has no
//! dependencies on rendering, input devices, clocks or I/O:
//!
//! - **Deterministic**: the same seed and the same `(dt, input)` sequence produce
//!   an identical event sequence
//! - **Step-driven**: [`GameState::step`] is the single entry point; it never blocks
//! - **Zero-allocation hot paths**: boards, shapes and kick tables are fixed-size
//!
//! # Module Structure
//!
//! - [`shapes`]: 4x4 shape bitmaps and SRS kick tables
//! - [`board`]: 10x20 playfield with collision detection and line clearing
//! - [`piece`]: the active piece and its ghost position
//! - [`rng`]: seeded PRNG and 7-bag piece queue
//! - [`rotation`]: rotation with wall kicks
//! - [`tspin`]: T-spin classification
//! - [`scoring`]: points, combo, back-to-back and perfect clears
//! - [`das`]: DAS/ARR auto-shift
//! - [`game_state`]: the controller tying everything together
//! - [`snapshot`]: copyable read-only view of a game
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every run of seven pieces drawn at a bag boundary
//!   contains each kind once
//! - **SRS Rotation**: guideline kick tables for JLSTZ and I; O rotates in place
//! - **Lock Delay**: 500ms on the ground, restarted by moves and rotations at most
//!   15 times per piece
//! - **Hold**: once per piece
//! - **T-Spin Detection**: 3-corner rule, front corners decide Proper or Mini,
//!   the final kick always counts as Proper
//! - **Scoring**: guideline tables, combo bonus, 3/2 back-to-back, perfect clears
//!
//! # Example
//!
//! ```
//! use srs_tetris_core::GameState;
//! use srs_tetris_core::types::{Event, InputSnapshot, KeyState};
//!
//! let mut game = GameState::new(12345);
//!
//! let mut input = InputSnapshot::IDLE;
//! input.hard_drop = KeyState::TAP;
//! let events = game.step(16, &input);
//!
//! assert!(events.iter().any(|e| matches!(e, Event::Lock { .. })));
//! assert!(game.score() > 0); // Hard drop awards points
//! ```

pub mod board;
pub mod builder;
pub mod config;
pub mod das;
pub mod error;
pub mod game_state;
pub mod piece;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod shapes;
pub mod snapshot;
pub mod tspin;

#[cfg(test)]
mod scenarios;

pub use srs_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use builder::GameBuilder;
pub use config::GameConfig;
pub use error::{GameError, SeedError};
pub use game_state::GameState;
pub use piece::Piece;
pub use rng::{PieceQueue, Seed, SimpleRng};
pub use rotation::{try_rotate, Kick, Rotated};
pub use scoring::{ScoreResult, ScoringState};
pub use shapes::{get_shape, kick_table};
pub use snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
