//! Timing configuration.
//!
//! All durations are integer milliseconds so that replays stay bit-exact.

use crate::error::GameError;
use crate::types::{
    DEFAULT_ARR_MS, DEFAULT_DAS_MS, DEFAULT_SOFT_DROP_INTERVAL_MS, FALL_BASE_MS, FALL_DEC_MS,
    FALL_FLOOR_MS, LOCK_DELAY_MS, LOCK_RESET_LIMIT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Hold time before auto-shift engages.
    pub das_ms: u32,
    /// Period between auto-shifts. 0 shifts straight to the wall.
    pub arr_ms: u32,
    /// Period between soft drop cells. 0 drops one cell every step.
    pub soft_drop_interval_ms: u32,
    pub lock_delay_ms: u32,
    pub max_lock_resets: u8,
    pub fall_base_ms: u32,
    pub fall_dec_ms: u32,
    pub fall_floor_ms: u32,
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            soft_drop_interval_ms: DEFAULT_SOFT_DROP_INTERVAL_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            max_lock_resets: LOCK_RESET_LIMIT,
            fall_base_ms: FALL_BASE_MS,
            fall_dec_ms: FALL_DEC_MS,
            fall_floor_ms: FALL_FLOOR_MS,
        }
    }

    pub fn with_das(mut self, das_ms: u32) -> Self {
        self.das_ms = das_ms;
        self
    }

    pub fn with_arr(mut self, arr_ms: u32) -> Self {
        self.arr_ms = arr_ms;
        self
    }

    pub fn with_soft_drop_interval(mut self, interval_ms: u32) -> Self {
        self.soft_drop_interval_ms = interval_ms;
        self
    }

    pub fn with_lock_delay(mut self, lock_delay_ms: u32, max_resets: u8) -> Self {
        self.lock_delay_ms = lock_delay_ms;
        self.max_lock_resets = max_resets;
        self
    }

    pub fn with_gravity(mut self, base_ms: u32, dec_ms: u32, floor_ms: u32) -> Self {
        self.fall_base_ms = base_ms;
        self.fall_dec_ms = dec_ms;
        self.fall_floor_ms = floor_ms;
        self
    }

    /// Gravity period for a level: `max(floor, base - level * dec)`.
    pub fn fall_period_ms(&self, level: u32) -> u32 {
        self.fall_base_ms
            .saturating_sub(level.saturating_mul(self.fall_dec_ms))
            .max(self.fall_floor_ms)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.lock_delay_ms == 0 {
            return Err(GameError::InvalidConfig("lock delay must be positive"));
        }
        if self.fall_floor_ms == 0 {
            return Err(GameError::InvalidConfig("gravity floor must be positive"));
        }
        if self.fall_base_ms < self.fall_floor_ms {
            return Err(GameError::InvalidConfig(
                "gravity base period is below its floor",
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
