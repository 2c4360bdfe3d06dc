//! Core types module - shared data structures and constants
//!
//! This crate defines the plain data that crosses the engine boundary: piece kinds,
//! rotation states, the per-frame input snapshot, and the events a step emits.
//! Nothing here owns game state, so the types are usable from the engine, from
//! tests, and from any frontend that consumes the event stream.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 visible rows (indexed 0-19, top to bottom)
//! - **Hidden buffer**: 4 rows above row 0 (rows -4..-1), always empty
//! - **Spawn position**: (3, 0); I pieces spawn at (3, -1)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_DAS_MS` | 170 | Hold time before auto-shift engages |
//! | `DEFAULT_ARR_MS` | 33 | Period between auto-shifts |
//! | `LOCK_DELAY_MS` | 500 | Time a grounded piece waits before locking |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock timer resets per piece |
//! | `FALL_BASE_MS` | 500 | Gravity base period |
//! | `FALL_DEC_MS` | 50 | Gravity period decrease per level |
//! | `FALL_FLOOR_MS` | 50 | Fastest gravity period |
//!
//! # Examples
//!
//! ```
//! use srs_tetris_types::{PieceKind, Rotation, RotateDirection, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! let rotation = Rotation::Spawn.rotate(RotateDirection::Cw);
//! assert_eq!(rotation, Rotation::Right);
//! assert_eq!(rotation.index(), 1);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

use arrayvec::ArrayVec;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 visible rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Rows above the visible field a piece may occupy (rows -4..-1).
pub const HIDDEN_ROWS: u8 = 4;

/// DAS (Delayed Auto Shift) delay in milliseconds.
pub const DEFAULT_DAS_MS: u32 = 170;

/// ARR (Auto Repeat Rate) in milliseconds.
pub const DEFAULT_ARR_MS: u32 = 33;

/// Soft drop repeat interval; 0 means one cell per step while held.
pub const DEFAULT_SOFT_DROP_INTERVAL_MS: u32 = 0;

/// Lock delay when piece is grounded (500ms).
pub const LOCK_DELAY_MS: u32 = 500;

/// Maximum number of lock timer resets per piece (15)
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Gravity period before any level reduction.
pub const FALL_BASE_MS: u32 = 500;

/// Gravity period reduction per level.
pub const FALL_DEC_MS: u32 = 50;

/// Gravity never gets faster than this.
pub const FALL_FLOOR_MS: u32 = 50;

/// Lines needed per level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Combo scoring base value (50 points per combo step)
pub const COMBO_BASE: u32 = 50;

/// Combo steps stop growing the bonus past this point.
pub const COMBO_CAP: u32 = 12;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u64 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u64 = 2;

/// Plain line clear base points, indexed by lines cleared.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// T-spin base points, indexed by lines cleared.
pub const TSPIN_SCORES: [u32; 4] = [400, 800, 1200, 1600];

/// Mini T-spin base points, indexed by lines cleared.
pub const TSPIN_MINI_SCORES: [u32; 3] = [100, 200, 400];

/// Perfect clear base points, indexed by lines cleared.
pub const PERFECT_CLEAR_SCORES: [u32; 5] = [0, 800, 1200, 1800, 2000];

/// Hard drop points per cell.
pub const HARD_DROP_POINTS: u32 = 2;

/// Soft drop points per cell.
pub const SOFT_DROP_POINTS: u32 = 1;


/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and guideline color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in table order. `PieceKind::ALL[k.index()] == k` always holds.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position of this kind in [`PieceKind::ALL`] (and in the shape tables).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use srs_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Guideline base color as RGB. Only meaningful to renderers.
    pub const fn color(self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (0, 240, 240),
            PieceKind::O => (240, 240, 0),
            PieceKind::T => (160, 0, 240),
            PieceKind::S => (0, 240, 0),
            PieceKind::Z => (240, 0, 0),
            PieceKind::J => (0, 0, 240),
            PieceKind::L => (240, 160, 0),
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **Spawn** (0): spawn orientation
/// - **Right** (1): rotated 90° clockwise
/// - **Flip** (2): rotated 180°
/// - **Left** (3): rotated 90° counter-clockwise
///
/// The clockwise cycle goes: Spawn → Right → Flip → Left → Spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    Spawn,
    Right,
    Flip,
    Left,
}

impl Rotation {
    /// Numeric state in `0..4`.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Build from any integer; the value is taken modulo 4.
    pub const fn from_index(i: u8) -> Self {
        match i % 4 {
            0 => Rotation::Spawn,
            1 => Rotation::Right,
            2 => Rotation::Flip,
            _ => Rotation::Left,
        }
    }

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use srs_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::Spawn.rotate_cw(), Rotation::Right);
    /// assert_eq!(Rotation::Left.rotate_cw(), Rotation::Spawn);
    /// ```
    pub const fn rotate_cw(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate counter-clockwise (-90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use srs_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::Spawn.rotate_ccw(), Rotation::Left);
    /// assert_eq!(Rotation::Right.rotate_ccw(), Rotation::Spawn);
    /// ```
    pub const fn rotate_ccw(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub const fn rotate(self, direction: RotateDirection) -> Self {
        match direction {
            RotateDirection::Cw => self.rotate_cw(),
            RotateDirection::Ccw => self.rotate_ccw(),
        }
    }
}

/// Direction of a single rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotateDirection {
    Cw,
    Ccw,
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: 3+ corners occupied but the front pair is not both filled
/// - **Proper**: 3+ corners occupied with both front corners filled, or reached
///   through the final JLSTZ kick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TSpinKind {
    None,
    Mini,
    Proper,
}

impl TSpinKind {
    pub fn is_spin(&self) -> bool {
        !matches!(self, TSpinKind::None)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled, tagged with the kind that filled it
pub type Cell = Option<PieceKind>;

/// State of one key during the frame preceding a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyState {
    /// Key is down at the end of the frame.
    pub held: bool,
    /// Key went from up to down during the frame.
    pub pressed: bool,
}

impl KeyState {
    pub const IDLE: KeyState = KeyState {
        held: false,
        pressed: false,
    };
    /// Fresh press that is still held.
    pub const TAP: KeyState = KeyState {
        held: true,
        pressed: true,
    };
    /// Held since an earlier frame.
    pub const HELD: KeyState = KeyState {
        held: true,
        pressed: false,
    };

    pub const fn from_transition(was_held: bool, is_held: bool) -> Self {
        KeyState {
            held: is_held,
            pressed: is_held && !was_held,
        }
    }
}

/// Per-step input consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSnapshot {
    pub left: KeyState,
    pub right: KeyState,
    pub soft_drop: KeyState,
    pub hard_drop: KeyState,
    pub rotate_cw: KeyState,
    pub rotate_ccw: KeyState,
    pub hold: KeyState,
}

/// Raw "is this key down" state, from which fresh presses are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
    pub hard_drop: bool,
    pub rotate_cw: bool,
    pub rotate_ccw: bool,
    pub hold: bool,
}

impl InputSnapshot {
    /// No keys held.
    pub const IDLE: InputSnapshot = InputSnapshot {
        left: KeyState::IDLE,
        right: KeyState::IDLE,
        soft_drop: KeyState::IDLE,
        hard_drop: KeyState::IDLE,
        rotate_cw: KeyState::IDLE,
        rotate_ccw: KeyState::IDLE,
        hold: KeyState::IDLE,
    };

    /// Derive a snapshot from the held keys of two consecutive frames.
    pub fn from_transition(prev: HeldKeys, now: HeldKeys) -> Self {
        InputSnapshot {
            left: KeyState::from_transition(prev.left, now.left),
            right: KeyState::from_transition(prev.right, now.right),
            soft_drop: KeyState::from_transition(prev.soft_drop, now.soft_drop),
            hard_drop: KeyState::from_transition(prev.hard_drop, now.hard_drop),
            rotate_cw: KeyState::from_transition(prev.rotate_cw, now.rotate_cw),
            rotate_ccw: KeyState::from_transition(prev.rotate_ccw, now.rotate_ccw),
            hold: KeyState::from_transition(prev.hold, now.hold),
        }
    }
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameOverReason {
    /// A newly spawned piece overlapped the stack.
    BlockOut,
    /// A piece locked with at least one cell above the visible field.
    LockOut,
}

/// Describes the last scoring lock, for display.
///
/// `Display` renders guideline-style text such as `"B2B T-Spin Triple"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionLabel {
    pub tspin: TSpinKind,
    pub lines: u8,
    pub perfect_clear: bool,
    /// The back-to-back multiplier was applied to this lock.
    pub back_to_back: bool,
    /// Combo count after this lock.
    pub combo: u32,
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = match self.lines {
            1 => " Single",
            2 => " Double",
            3 => " Triple",
            _ => "",
        };
        if self.back_to_back {
            write!(f, "B2B ")?;
        }
        match self.tspin {
            TSpinKind::Proper => write!(f, "T-Spin{count}")?,
            TSpinKind::Mini => write!(f, "Mini T-Spin{count}")?,
            TSpinKind::None => {
                let name = match self.lines {
                    1 => "Single",
                    2 => "Double",
                    3 => "Triple",
                    4 => "Tetris",
                    _ => "",
                };
                write!(f, "{name}")?;
            }
        }
        if self.combo >= 2 {
            write!(f, " Combo x{}", self.combo)?;
        }
        if self.perfect_clear {
            write!(f, " Perfect Clear")?;
        }
        Ok(())
    }
}

/// A meaningful transition reported by one step, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Event {
    /// A new active piece entered the field.
    Spawn { piece_kind: PieceKind, x: i8, y: i8 },
    /// The active piece shifted horizontally or fell by gravity.
    Move { dx: i8, dy: i8, x: i8, y: i8 },
    /// A rotation succeeded. `kick_index` 0 means no kick was needed.
    Rotate {
        from: Rotation,
        to: Rotation,
        kick_index: u8,
        x: i8,
        y: i8,
    },
    /// The active piece descended by soft drop.
    SoftDrop { cells: u8 },
    /// The active piece was dropped to its ghost position.
    HardDrop { cells: u8 },
    /// The active piece went into the hold slot.
    Hold {
        held: PieceKind,
        swapped_in: Option<PieceKind>,
    },
    /// The active piece was written into the playfield.
    Lock {
        piece_kind: PieceKind,
        tspin: TSpinKind,
        lines: u8,
        perfect_clear: bool,
    },
    /// Rows removed by the last lock, bottom to top, in pre-clear coordinates.
    LinesCleared { rows: ArrayVec<u8, 4>, count: u8 },
    ScoreChanged {
        delta: u64,
        total: u64,
        action_label: Option<ActionLabel>,
    },
    LevelUp { level: u32 },
    GameOver { reason: GameOverReason },
}
