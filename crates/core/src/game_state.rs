//! Game state module - the controller that owns a whole game
//!
//! [`GameState::step`] is the only way the game advances. Each call runs the same
//! fixed sequence of phases and reports what happened as [`Event`]s:
//!
//! 1. horizontal movement (DAS/ARR, left then right)
//! 2. soft drop
//! 3. rotation (clockwise, then counter-clockwise)
//! 4. hold
//! 5. hard drop
//! 6. gravity
//! 7. lock delay
//!
//! A lock ends the step; the next piece is already spawned but first acts on the
//! following call.

use crate::board::Board;
use crate::builder::GameBuilder;
use crate::config::GameConfig;
use crate::das::{DasState, Shift};
use crate::error::GameError;
use crate::piece::Piece;
use crate::rng::{PieceQueue, Seed};
use crate::rotation::{try_rotate, Kick};
use crate::scoring::ScoringState;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
use crate::tspin;
use crate::types::{
    ActionLabel, Cell, Event, GameOverReason, InputSnapshot, PieceKind, RotateDirection,
    BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS,
};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<Piece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    queue: PieceQueue,
    scoring: ScoringState,
    last_label: Option<ActionLabel>,
    das_left: DasState,
    das_right: DasState,
    soft_drop_timer_ms: u32,
    fall_timer_ms: u32,
    lock_timer_ms: u32,
    lock_resets: u8,
    on_ground: bool,
    /// Kick of the last successful action, if that action was a rotation.
    last_kick: Option<Kick>,
    pieces_locked: u32,
    game_over: Option<GameOverReason>,
    /// Events raised while constructing the game, handed out by the first step.
    pending: Vec<Event>,
}

impl GameState {
    /// Create a new game with the given seed and default timings.
    pub fn new(seed: u64) -> Self {
        Self::from_parts(seed, GameConfig::default(), Board::new(), &[])
    }

    pub fn with_config(seed: u64, config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self::from_parts(seed, config, Board::new(), &[]))
    }

    /// Parse `seed` (decimal or `0x` hex) and create a game.
    pub fn from_seed_str(seed: &str, config: GameConfig) -> Result<Self, GameError> {
        let Seed(seed) = seed.parse()?;
        Self::with_config(seed, config)
    }

    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    /// Assemble a game and spawn its first piece. Inputs must already be validated.
    pub(crate) fn from_parts(
        seed: u64,
        config: GameConfig,
        board: Board,
        upcoming: &[PieceKind],
    ) -> Self {
        let mut queue = PieceQueue::new(seed);
        if !upcoming.is_empty() {
            queue.push_front(upcoming);
        }

        let mut state = Self {
            config,
            board,
            active: None,
            hold: None,
            can_hold: true,
            queue,
            scoring: ScoringState::new(),
            last_label: None,
            das_left: DasState::new(),
            das_right: DasState::new(),
            soft_drop_timer_ms: 0,
            fall_timer_ms: 0,
            lock_timer_ms: 0,
            lock_resets: 0,
            on_ground: false,
            last_kick: None,
            pieces_locked: 0,
            game_over: None,
            pending: Vec::new(),
        };

        let mut events = Vec::new();
        let first = state.queue.draw();
        state.spawn(first, &mut events);
        state.pending = events;
        state
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<Piece> {
        self.active
    }

    /// Resting row of the active piece after an unlimited soft drop.
    pub fn ghost_y(&self) -> Option<i8> {
        self.active.map(|piece| piece.ghost_drop(&self.board))
    }

    pub fn next_preview(&self) -> PieceKind {
        self.queue.peek()
    }

    pub fn next_queue(&self) -> [PieceKind; 5] {
        self.queue.peek_5()
    }

    pub fn hold_preview(&self) -> Option<PieceKind> {
        self.hold
    }

    /// Contents of a visible cell; `None` for empty or out-of-field coordinates.
    pub fn playfield_cell(&self, x: i8, y: i8) -> Cell {
        self.board.get(x, y).flatten()
    }

    pub fn score(&self) -> u64 {
        self.scoring.score
    }

    pub fn level(&self) -> u32 {
        self.scoring.level()
    }

    pub fn lines(&self) -> u32 {
        self.scoring.lines
    }

    pub fn combo(&self) -> u32 {
        self.scoring.combo
    }

    pub fn b2b_active(&self) -> bool {
        self.scoring.back_to_back
    }

    pub fn perfect_clear_count(&self) -> u32 {
        self.scoring.perfect_clear_count
    }

    /// Text for the most recent scoring lock, e.g. `"B2B T-Spin Double"`.
    pub fn last_action_label(&self) -> Option<String> {
        self.last_label.map(|label| label.to_string())
    }

    pub fn last_action(&self) -> Option<ActionLabel> {
        self.last_label
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn lock_resets(&self) -> u8 {
        self.lock_resets
    }

    pub fn lock_timer_ms(&self) -> u32 {
        self.lock_timer_ms
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Kick used by the active piece's last action, when that action was a
    /// rotation. Moves and drops clear it.
    pub fn last_kick(&self) -> Option<Kick> {
        self.last_kick
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.hold = self.hold;
        out.next_queue = self.queue.peek_5();
        out.can_hold = self.can_hold;
        out.game_over = self.game_over;
        out.pieces_locked = self.pieces_locked;
        out.score = self.scoring.score;
        out.level = self.scoring.level();
        out.lines = self.scoring.lines;
        out.combo = self.scoring.combo;
        out.back_to_back = self.scoring.back_to_back;
        out.perfect_clears = self.scoring.perfect_clear_count;
        out.timers = TimersSnapshot {
            fall_ms: self.fall_timer_ms,
            lock_ms: self.lock_timer_ms,
            lock_resets: self.lock_resets,
            on_ground: self.on_ground,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    // ---------------------------------------------------------------------
    // Stepping
    // ---------------------------------------------------------------------

    /// Advance the game by `elapsed_ms` with the given input.
    ///
    /// Returns the events of this step in the order they happened. Once the game
    /// is over every call returns an empty list.
    pub fn step(&mut self, elapsed_ms: u32, input: &InputSnapshot) -> Vec<Event> {
        let mut events = Vec::new();
        self.step_into(elapsed_ms, input, &mut events);
        events
    }

    /// Like [`step`](Self::step), appending to a caller-owned buffer.
    pub fn step_into(&mut self, elapsed_ms: u32, input: &InputSnapshot, events: &mut Vec<Event>) {
        events.append(&mut self.pending);
        if self.game_over.is_some() || self.active.is_none() {
            return;
        }

        self.process_horizontal(elapsed_ms, input, events);
        self.process_soft_drop(elapsed_ms, input, events);

        if input.rotate_cw.pressed {
            self.rotate(RotateDirection::Cw, events);
        }
        if input.rotate_ccw.pressed {
            self.rotate(RotateDirection::Ccw, events);
        }

        if input.hold.pressed {
            self.hold(events);
            if self.active.is_none() {
                return;
            }
        }

        if input.hard_drop.pressed {
            self.hard_drop(events);
            return;
        }

        self.apply_gravity(elapsed_ms, events);
        self.update_lock_delay(elapsed_ms, events);
    }

    fn process_horizontal(&mut self, elapsed_ms: u32, input: &InputSnapshot, events: &mut Vec<Event>) {
        let config = self.config;
        let left = self.das_left.update(input.left, elapsed_ms, &config);
        let right = self.das_right.update(input.right, elapsed_ms, &config);
        self.shift(-1, left, events);
        self.shift(1, right, events);
    }

    fn shift(&mut self, dx: i8, shift: Shift, events: &mut Vec<Event>) {
        let attempts = match shift {
            Shift::None => return,
            Shift::Cells(n) => n.min(BOARD_WIDTH as u32),
            Shift::ToWall => BOARD_WIDTH as u32,
        };

        let mut moved: i8 = 0;
        for _ in 0..attempts {
            if !self.try_move(dx, 0) {
                break;
            }
            moved += dx;
            self.reset_lock_delay();
        }

        if moved != 0 {
            self.last_kick = None;
            if let Some(piece) = self.active {
                events.push(Event::Move {
                    dx: moved,
                    dy: 0,
                    x: piece.x,
                    y: piece.y,
                });
            }
        }
    }

    fn process_soft_drop(&mut self, elapsed_ms: u32, input: &InputSnapshot, events: &mut Vec<Event>) {
        let key = input.soft_drop;
        if !key.held && !key.pressed {
            self.soft_drop_timer_ms = 0;
            return;
        }

        let interval = self.config.soft_drop_interval_ms;
        let attempts = if interval == 0 || key.pressed {
            self.soft_drop_timer_ms = 0;
            1
        } else {
            self.soft_drop_timer_ms = self.soft_drop_timer_ms.saturating_add(elapsed_ms);
            let n = self.soft_drop_timer_ms / interval;
            self.soft_drop_timer_ms %= interval;
            n.min((BOARD_HEIGHT + HIDDEN_ROWS) as u32)
        };

        let mut cells: u8 = 0;
        for _ in 0..attempts {
            if !self.try_move(0, 1) {
                break;
            }
            cells += 1;
            self.reset_lock_delay();
        }

        if cells > 0 {
            self.last_kick = None;
            let delta = self.scoring.add_drop(cells as u32, false);
            events.push(Event::SoftDrop { cells });
            events.push(Event::ScoreChanged {
                delta,
                total: self.scoring.score,
                action_label: None,
            });
        }
    }

    fn rotate(&mut self, direction: RotateDirection, events: &mut Vec<Event>) {
        let Some(piece) = self.active else {
            return;
        };
        let Some(rotated) = try_rotate(&piece, direction, &self.board) else {
            return;
        };

        self.active = Some(rotated.piece);
        self.last_kick = Some(rotated.kick());
        self.reset_lock_delay();
        events.push(Event::Rotate {
            from: piece.rotation,
            to: rotated.piece.rotation,
            kick_index: rotated.kick_index,
            x: rotated.piece.x,
            y: rotated.piece.y,
        });
    }

    /// Swap the active piece with the hold slot. Returns false when holding is
    /// not allowed for this piece.
    fn hold(&mut self, events: &mut Vec<Event>) -> bool {
        if !self.can_hold {
            return false;
        }
        let Some(piece) = self.active.take() else {
            return false;
        };

        let swapped_in = self.hold.replace(piece.kind);
        events.push(Event::Hold {
            held: piece.kind,
            swapped_in,
        });

        let next = match swapped_in {
            Some(kind) => kind,
            None => self.queue.draw(),
        };
        self.can_hold = false;
        self.spawn(next, events);
        true
    }

    fn hard_drop(&mut self, events: &mut Vec<Event>) {
        let Some(piece) = self.active else {
            return;
        };

        let ghost_y = piece.ghost_drop(&self.board);
        let cells = (ghost_y - piece.y) as u8;
        self.active = Some(Piece { y: ghost_y, ..piece });

        events.push(Event::HardDrop { cells });
        if cells > 0 {
            self.last_kick = None;
            let delta = self.scoring.add_drop(cells as u32, true);
            events.push(Event::ScoreChanged {
                delta,
                total: self.scoring.score,
                action_label: None,
            });
        }

        self.lock_active(events);
    }

    fn apply_gravity(&mut self, elapsed_ms: u32, events: &mut Vec<Event>) {
        let period = self.config.fall_period_ms(self.level()).max(1);
        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);

        while self.fall_timer_ms >= period {
            if !self.try_move(0, 1) {
                self.fall_timer_ms = 0;
                return;
            }
            self.fall_timer_ms -= period;
            if let Some(piece) = self.active {
                events.push(Event::Move {
                    dx: 0,
                    dy: 1,
                    x: piece.x,
                    y: piece.y,
                });
            }
        }
    }

    fn update_lock_delay(&mut self, elapsed_ms: u32, events: &mut Vec<Event>) {
        let Some(piece) = self.active else {
            return;
        };

        let grounded = piece.is_grounded(&self.board);
        if grounded && !self.on_ground {
            self.lock_timer_ms = 0;
            self.lock_resets = 0;
        }
        self.on_ground = grounded;
        if !grounded {
            return;
        }

        self.lock_timer_ms = self.lock_timer_ms.saturating_add(elapsed_ms);
        if self.lock_timer_ms >= self.config.lock_delay_ms {
            self.lock_active(events);
        }
    }

    /// Try to move the active piece
    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let moved = piece.shifted(dx, dy);
        if moved.is_valid(&self.board) {
            self.active = Some(moved);
            true
        } else {
            false
        }
    }

    /// Restart the lock timer after a successful player action on the ground,
    /// up to the configured number of resets per piece.
    fn reset_lock_delay(&mut self) {
        if self.on_ground && self.lock_resets < self.config.max_lock_resets {
            self.lock_timer_ms = 0;
            self.lock_resets += 1;
        }
    }

    /// Lock the active piece onto the board, score it and bring in the next one.
    fn lock_active(&mut self, events: &mut Vec<Event>) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let kick_index = self.last_kick.map(|kick| kick.index);
        let tspin = tspin::classify(&piece, &self.board, kick_index);
        let lock_out = piece.is_above_field();
        let level_before = self.scoring.level();

        self.board.place(&piece);
        let rows = self.board.clear_full_rows();
        let lines = rows.len() as u8;
        let perfect_clear = lines > 0 && self.board.is_empty();
        self.pieces_locked += 1;

        events.push(Event::Lock {
            piece_kind: piece.kind,
            tspin,
            lines,
            perfect_clear,
        });
        if lines > 0 {
            events.push(Event::LinesCleared {
                rows: rows.iter().map(|&row| row as u8).collect(),
                count: lines,
            });
        }

        let result = self.scoring.on_lock(lines, tspin, perfect_clear);
        if result.total > 0 {
            events.push(Event::ScoreChanged {
                delta: result.total,
                total: self.scoring.score,
                action_label: result.label,
            });
        }
        if result.label.is_some() {
            self.last_label = result.label;
        }

        let level = self.scoring.level();
        if level > level_before {
            events.push(Event::LevelUp { level });
        }

        self.can_hold = true;
        if lock_out {
            self.end_game(GameOverReason::LockOut, events);
            return;
        }

        let next = self.queue.draw();
        self.spawn(next, events);
    }

    fn spawn(&mut self, kind: PieceKind, events: &mut Vec<Event>) {
        self.reset_piece_state();

        let piece = Piece::spawn(kind);
        if !piece.is_valid(&self.board) {
            self.end_game(GameOverReason::BlockOut, events);
            return;
        }

        self.active = Some(piece);
        events.push(Event::Spawn {
            piece_kind: kind,
            x: piece.x,
            y: piece.y,
        });
    }

    fn reset_piece_state(&mut self) {
        self.fall_timer_ms = 0;
        self.lock_timer_ms = 0;
        self.lock_resets = 0;
        self.on_ground = false;
        self.soft_drop_timer_ms = 0;
        self.last_kick = None;
    }

    fn end_game(&mut self, reason: GameOverReason, events: &mut Vec<Event>) {
        self.active = None;
        self.game_over = Some(reason);
        events.push(Event::GameOver { reason });
    }

    // ---------------------------------------------------------------------
    // Test setup
    // ---------------------------------------------------------------------

    /// Replace the active piece, as if it had just spawned there.
    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: Piece) {
        assert!(piece.is_valid(&self.board), "test piece collides: {piece:?}");
        self.reset_piece_state();
        self.active = Some(piece);
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn scoring_mut(&mut self) -> &mut ScoringState {
        &mut self.scoring
    }

    #[cfg(test)]
    pub(crate) fn queue_mut(&mut self) -> &mut PieceQueue {
        &mut self.queue
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
