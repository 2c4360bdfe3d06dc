//! Scoring module - guideline scoring with combo, back-to-back and perfect clears
//!
//! Points for one lock are computed as
//!
//! ```text
//! subtotal = base + combo_bonus
//! delta    = floor(subtotal * level * (3/2 if back-to-back applies))
//! ```
//!
//! where `base` comes from the line, T-spin or perfect-clear table and the level is
//! the one in effect before the lock's lines are counted.

use crate::types::{
    ActionLabel, TSpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BASE, COMBO_CAP, HARD_DROP_POINTS,
    LINES_PER_LEVEL, LINE_SCORES, PERFECT_CLEAR_SCORES, SOFT_DROP_POINTS, TSPIN_MINI_SCORES,
    TSPIN_SCORES,
};

/// Score calculation result for one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Table points before combo, level and back-to-back.
    pub base: u64,
    /// Combo bonus added to `base` before scaling.
    pub combo_bonus: u64,
    /// Whether the 3/2 multiplier was applied.
    pub b2b_applied: bool,
    /// Whether this lock keeps (or starts) a back-to-back chain.
    pub difficult: bool,
    /// Points added to the running score.
    pub total: u64,
    /// `None` for a lock that scored nothing.
    pub label: Option<ActionLabel>,
}

/// Table points for a lock without perfect clear.
pub fn base_points(tspin: TSpinKind, lines: u8) -> u64 {
    let table: &[u32] = match tspin {
        TSpinKind::None => &LINE_SCORES,
        TSpinKind::Mini => &TSPIN_MINI_SCORES,
        TSpinKind::Proper => &TSPIN_SCORES,
    };
    table.get(lines as usize).copied().unwrap_or(0) as u64
}

/// Perfect-clear table points, scaled by how many perfect clears have happened
/// so far (including this one).
pub fn perfect_clear_points(lines: u8, perfect_clear_count: u32) -> u64 {
    let base = PERFECT_CLEAR_SCORES
        .get(lines as usize)
        .copied()
        .unwrap_or(0) as u64;
    base.saturating_mul(perfect_clear_count as u64)
}

/// Combo bonus for a chain that has already been incremented for this clear.
///
/// The first clear of a chain (`combo == 1`) earns nothing.
pub fn combo_bonus(combo: u32) -> u64 {
    let steps = combo.saturating_sub(1).min(COMBO_CAP);
    (steps * COMBO_BASE) as u64
}

/// Check if this clear qualifies for back-to-back
///
/// Difficult clears are tetrises and T-spins (proper or mini) that clear lines.
pub fn qualifies_for_b2b(tspin: TSpinKind, lines: u8) -> bool {
    match tspin {
        TSpinKind::None => lines == 4,
        TSpinKind::Mini | TSpinKind::Proper => lines >= 1,
    }
}

/// Apply the back-to-back multiplier (3/2), rounding down.
pub fn apply_b2b_multiplier(points: u64) -> u64 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Level management
/// Level starts at 1 and increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    1 + total_lines / LINES_PER_LEVEL
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn drop_score(cells: u32, is_hard_drop: bool) -> u64 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    cells as u64 * per_cell as u64
}

/// Running score, combo chain, back-to-back flag and line total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringState {
    pub score: u64,
    /// Consecutive line-clearing locks, 0 when no chain is running.
    pub combo: u32,
    pub back_to_back: bool,
    pub perfect_clear_count: u32,
    pub lines: u32,
}

impl ScoringState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u32 {
        calculate_level(self.lines)
    }

    /// Account for one lock and return what it earned.
    ///
    /// - A line clear increments the combo and updates back-to-back.
    /// - A zero-line T-spin scores its table value and leaves combo and
    ///   back-to-back alone.
    /// - Any other zero-line lock breaks the combo and scores nothing.
    pub fn on_lock(&mut self, lines: u8, tspin: TSpinKind, perfect_clear: bool) -> ScoreResult {
        let level = self.level() as u64;

        if lines == 0 {
            if !tspin.is_spin() {
                self.combo = 0;
                return ScoreResult::default();
            }
            let base = base_points(tspin, 0);
            let total = base.saturating_mul(level);
            self.score = self.score.saturating_add(total);
            return ScoreResult {
                base,
                combo_bonus: 0,
                b2b_applied: false,
                difficult: false,
                total,
                label: Some(ActionLabel {
                    tspin,
                    lines: 0,
                    perfect_clear: false,
                    back_to_back: false,
                    combo: 0,
                }),
            };
        }

        self.combo += 1;
        let base = if perfect_clear {
            self.perfect_clear_count += 1;
            perfect_clear_points(lines, self.perfect_clear_count)
        } else {
            base_points(tspin, lines)
        };
        let combo_bonus = combo_bonus(self.combo);

        let difficult = qualifies_for_b2b(tspin, lines);
        let b2b_applied = difficult && self.back_to_back;
        let scaled = base.saturating_add(combo_bonus).saturating_mul(level);
        let total = if b2b_applied {
            apply_b2b_multiplier(scaled)
        } else {
            scaled
        };

        self.back_to_back = difficult;
        self.lines += lines as u32;
        self.score = self.score.saturating_add(total);

        ScoreResult {
            base,
            combo_bonus,
            b2b_applied,
            difficult,
            total,
            label: Some(ActionLabel {
                tspin,
                lines,
                perfect_clear,
                back_to_back: b2b_applied,
                combo: self.combo,
            }),
        }
    }

    /// Credit soft or hard drop cells and return the points added.
    pub fn add_drop(&mut self, cells: u32, is_hard_drop: bool) -> u64 {
        let points = drop_score(cells, is_hard_drop);
        self.score = self.score.saturating_add(points);
        points
    }
}
