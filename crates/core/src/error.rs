//! Construction errors.
//!
//! Everything that can go wrong once a game is running is either a plain `bool`
//! (blocked move, failed rotation, rejected hold) or an internal invariant that
//! panics. Only building a game can fail in a way the caller must handle.

use std::fmt;

/// A seed string that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedError {
    /// No digits were given.
    Empty,
    /// The value does not fit in 64 bits.
    TooLong,
    /// A character that is not a digit of the seed's radix.
    InvalidDigit(char),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Empty => write!(f, "seed is empty"),
            SeedError::TooLong => write!(f, "seed does not fit in 64 bits"),
            SeedError::InvalidDigit(c) => write!(f, "seed contains invalid digit {c:?}"),
        }
    }
}

impl std::error::Error for SeedError {}

/// Failure to construct a [`GameState`](crate::GameState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameError {
    InvalidSeed(SeedError),
    InvalidConfig(&'static str),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidSeed(e) => write!(f, "invalid seed: {e}"),
            GameError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::InvalidSeed(e) => Some(e),
            GameError::InvalidConfig(_) => None,
        }
    }
}

impl From<SeedError> for GameError {
    fn from(e: SeedError) -> Self {
        GameError::InvalidSeed(e)
    }
}
