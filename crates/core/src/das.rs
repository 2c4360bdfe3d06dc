//! DAS/ARR auto-shift timing.
//!
//! Left and right each own a [`DasState`]; releasing one direction never touches
//! the other's charge. Timing is driven purely by the `dt` handed to each step.

use crate::config::GameConfig;
use crate::types::KeyState;

/// How far one direction wants to shift this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    None,
    /// Attempt this many one-cell moves, stopping at the first collision.
    Cells(u32),
    /// Move until blocked (ARR of 0).
    ToWall,
}

/// Auto-shift state for one horizontal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DasState {
    /// Direction is currently held.
    pub charging: bool,
    /// Time held since the press, or since the last auto-shift once active.
    pub das_timer: u32,
    /// The initial delay has elapsed.
    pub das_active: bool,
}

impl DasState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one step.
    ///
    /// A fresh press shifts once and restarts the charge. While held, the timer
    /// runs until it reaches `das_ms`, at which point auto-shift activates and the
    /// timer restarts; from then on one cell is shifted per `arr_ms`.
    pub fn update(&mut self, key: KeyState, elapsed_ms: u32, config: &GameConfig) -> Shift {
        if key.pressed {
            self.charging = key.held;
            self.das_timer = 0;
            self.das_active = false;
            return Shift::Cells(1);
        }

        if !key.held {
            self.reset();
            return Shift::None;
        }

        self.charging = true;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);

        if !self.das_active {
            if self.das_timer >= config.das_ms {
                self.das_active = true;
                self.das_timer = 0;
            }
            return Shift::None;
        }

        if config.arr_ms == 0 {
            self.das_timer = 0;
            return Shift::ToWall;
        }

        let cells = self.das_timer / config.arr_ms;
        self.das_timer %= config.arr_ms;
        if cells == 0 {
            Shift::None
        } else {
            Shift::Cells(cells)
        }
    }

    /// Forget the charge (key released).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
