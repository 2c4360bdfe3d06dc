//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled.
//! The queue is topped up with a fresh bag whenever fewer than seven pieces remain,
//! so the preview always reaches at least one full bag ahead.
//!
//! The PRNG is a seeded 64-bit LCG owned by the bag; nothing reads ambient entropy.

use std::collections::VecDeque;
use std::str::FromStr;

use arrayvec::ArrayVec;

use crate::error::SeedError;
use crate::types::PieceKind;

/// Simple 64-bit LCG (Knuth's MMIX constants), output taken from the high bits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// A validated game seed.
///
/// Parses from decimal (`"12345"`) or `0x`-prefixed hexadecimal (`"0xdeadbeef"`),
/// at most one `u64` wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed(pub u64);

impl FromStr for Seed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SeedError::Empty);
        }

        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => (hex, 16),
            None => (s, 10),
        };
        if digits.is_empty() {
            return Err(SeedError::Empty);
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_digit(radix)) {
            return Err(SeedError::InvalidDigit(bad));
        }
        if radix == 16 && digits.len() > 16 {
            return Err(SeedError::TooLong);
        }

        u64::from_str_radix(digits, radix)
            .map(Seed)
            .map_err(|_| SeedError::TooLong)
    }
}

/// Most pieces the queue can hold: six left over plus a fresh bag.
const QUEUE_CAPACITY: usize = 14;

/// 7-bag piece generator
///
/// Pieces forced through [`push_front`](Self::push_front) wait in their own
/// buffer ahead of the seeded bags, so the bags themselves are never cut short.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceQueue {
    forced: VecDeque<PieceKind>,
    queue: ArrayVec<PieceKind, QUEUE_CAPACITY>,
    rng: SimpleRng,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u64) -> Self {
        let mut queue = Self {
            forced: VecDeque::new(),
            queue: ArrayVec::new(),
            rng: SimpleRng::new(seed),
        };
        queue.refill();
        queue
    }

    /// Top the bag queue up until it holds at least seven pieces.
    fn refill(&mut self) {
        while self.queue.len() < 7 {
            let mut bag = PieceKind::ALL;
            self.rng.shuffle(&mut bag);
            self.queue.extend(bag);
        }
    }

    fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.forced.iter().chain(self.queue.iter()).copied()
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        self.forced.front().copied().unwrap_or(self.queue[0])
    }

    /// Peek at the next 5 pieces (for next queue).
    pub fn peek_5(&self) -> [PieceKind; 5] {
        // The bag queue alone always holds at least seven pieces.
        let mut out = [self.queue[0]; 5];
        for (slot, kind) in out.iter_mut().zip(self.upcoming()) {
            *slot = kind;
        }
        out
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        if let Some(kind) = self.forced.pop_front() {
            return kind;
        }
        let piece = self.queue.remove(0);
        self.refill();
        piece
    }

    /// Pieces waiting, forced ones included.
    pub fn len(&self) -> usize {
        self.forced.len() + self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Put specific pieces at the front of the queue (puzzle setups and tests).
    ///
    /// They are dealt in the given order before anything already queued.
    pub fn push_front(&mut self, pieces: &[PieceKind]) {
        for &kind in pieces.iter().rev() {
            self.forced.push_front(kind);
        }
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
