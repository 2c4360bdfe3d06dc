//! SRS Tetris (workspace facade crate).
//!
//! Re-exports the engine as `srs_tetris::{core, types}` while the implementation
//! lives in dedicated crates under `crates/`. The [`headless`] module drives the
//! `srs-tetris` binary.

pub mod headless;

pub use srs_tetris_core as core;
pub use srs_tetris_types as types;
