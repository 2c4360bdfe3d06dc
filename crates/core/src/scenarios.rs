//! End-to-end games driven only through `step`.

use crate::board::Board;
use crate::game_state::GameState;
use crate::piece::Piece;
use crate::rng::SimpleRng;
use crate::types::{
    Event, GameOverReason, InputSnapshot, KeyState, PieceKind, Rotation, TSpinKind,
    LOCK_RESET_LIMIT,
};

fn input(f: impl FnOnce(&mut InputSnapshot)) -> InputSnapshot {
    let mut input = InputSnapshot::IDLE;
    f(&mut input);
    input
}

fn tap_left() -> InputSnapshot {
    input(|i| i.left = KeyState::TAP)
}

fn tap_right() -> InputSnapshot {
    input(|i| i.right = KeyState::TAP)
}

fn tap_cw() -> InputSnapshot {
    input(|i| i.rotate_cw = KeyState::TAP)
}

fn tap_hard_drop() -> InputSnapshot {
    input(|i| i.hard_drop = KeyState::TAP)
}

fn game(board: Board, upcoming: &[PieceKind]) -> GameState {
    let mut game = GameState::builder()
        .seed(2024)
        .board(board)
        .upcoming(upcoming)
        .build()
        .unwrap();
    // Flush the opening spawn.
    game.step(0, &InputSnapshot::IDLE);
    game
}

fn find_lock(events: &[Event]) -> Option<(PieceKind, TSpinKind, u8, bool)> {
    events.iter().find_map(|e| match *e {
        Event::Lock {
            piece_kind,
            tspin,
            lines,
            perfect_clear,
        } => Some((piece_kind, tspin, lines, perfect_clear)),
        _ => None,
    })
}

/// Score events carrying an action label, i.e. the ones produced by a lock.
fn lock_score(events: &[Event]) -> Option<(u64, String)> {
    events.iter().find_map(|e| match e {
        Event::ScoreChanged {
            delta,
            action_label: Some(label),
            ..
        } => Some((*delta, label.to_string())),
        _ => None,
    })
}

/// Rotate a spawned I upright and park it in column 9.
fn steer_i_to_right_wall(game: &mut GameState) {
    let events = game.step(0, &tap_cw());
    assert!(matches!(
        events[0],
        Event::Rotate {
            to: Rotation::Right,
            kick_index: 0,
            ..
        }
    ));
    for _ in 0..4 {
        game.step(0, &tap_right());
    }
    let piece = game.current_piece().unwrap();
    assert_eq!(piece.x + 2, 9);
}

/// Board for the T-spin triple: overhang at (1, 15), cavity in column 1
/// on rows 17..19 with a notch at (2, 18).
fn tst_board() -> Board {
    Board::from_ascii(&[
        "XX........",
        "X.........",
        "X.XXXXXXXX",
        "X..XXXXXXX",
        "X.XXXXXXXX",
    ])
}

/// Land a T next to the overhang, slide it under, then spin it in.
fn play_tst(game: &mut GameState) -> Vec<Event> {
    game.step(0, &tap_left());
    game.step(0, &input(|i| i.soft_drop = KeyState::TAP));
    for _ in 0..14 {
        game.step(0, &input(|i| i.soft_drop = KeyState::HELD));
    }
    let piece = game.current_piece().unwrap();
    assert_eq!((piece.x, piece.y), (2, 15));
    assert!(game.is_on_ground());

    game.step(0, &tap_left());
    let events = game.step(0, &tap_cw());
    assert_eq!(
        events,
        vec![Event::Rotate {
            from: Rotation::Spawn,
            to: Rotation::Right,
            kick_index: 4,
            x: 0,
            y: 17
        }]
    );

    game.step(500, &InputSnapshot::IDLE)
}

#[test]
fn scenario_single_line_clear() {
    let mut game = game(Board::from_ascii(&["XXXXXXXXX."]), &[PieceKind::I]);
    steer_i_to_right_wall(&mut game);

    let events = game.step(0, &tap_hard_drop());
    assert_eq!(events[0], Event::HardDrop { cells: 17 });
    assert_eq!(
        find_lock(&events),
        Some((PieceKind::I, TSpinKind::None, 1, false))
    );
    assert!(events.contains(&Event::LinesCleared {
        rows: [19u8].into_iter().collect(),
        count: 1
    }));
    assert_eq!(lock_score(&events), Some((100, "Single".to_string())));

    assert_eq!(game.combo(), 1);
    assert_eq!(game.lines(), 1);
    assert_eq!(game.score(), 34 + 100);
    assert_eq!(game.last_action_label().as_deref(), Some("Single"));

    // The three I cells above row 19 moved down one row.
    for y in 17..20 {
        assert_eq!(game.playfield_cell(9, y), Some(PieceKind::I));
    }
    assert_eq!(game.playfield_cell(0, 19), None);
    assert_eq!(game.board().filled_count(), 3);
}

#[test]
fn scenario_tspin_triple_with_final_kick() {
    let mut game = game(tst_board(), &[PieceKind::T]);
    let events = play_tst(&mut game);

    assert_eq!(
        find_lock(&events),
        Some((PieceKind::T, TSpinKind::Proper, 3, false))
    );
    assert_eq!(lock_score(&events), Some((1600, "T-Spin Triple".to_string())));
    assert!(game.b2b_active());
    assert_eq!(game.combo(), 1);
    assert_eq!(game.lines(), 3);

    // Only the overhang rows remain.
    assert_eq!(game.playfield_cell(0, 18), Some(PieceKind::I));
    assert_eq!(game.playfield_cell(1, 18), Some(PieceKind::I));
    assert_eq!(game.playfield_cell(0, 19), Some(PieceKind::I));
    assert_eq!(game.board().filled_count(), 3);
}

#[test]
fn scenario_back_to_back_tetris() {
    let mut game = game(tst_board(), &[PieceKind::T]);
    play_tst(&mut game);
    assert!(game.b2b_active());

    *game.board_mut() = Board::from_ascii(&[
        "X.........",
        "XXXXXXXXX.",
        "XXXXXXXXX.",
        "XXXXXXXXX.",
        "XXXXXXXXX.",
    ]);
    game.set_active(Piece::spawn(PieceKind::I));
    steer_i_to_right_wall(&mut game);

    let events = game.step(0, &tap_hard_drop());
    assert_eq!(
        find_lock(&events),
        Some((PieceKind::I, TSpinKind::None, 4, false))
    );
    // (800 + 50 combo) * 3/2
    assert_eq!(
        lock_score(&events),
        Some((1275, "B2B Tetris Combo x2".to_string()))
    );
    assert!(game.b2b_active());
    assert_eq!(game.combo(), 2);
    assert_eq!(game.lines(), 7);
}

#[test]
fn scenario_zero_line_lock_breaks_combo() {
    let mut game = game(Board::new(), &[PieceKind::S]);
    game.scoring_mut().combo = 3;
    game.scoring_mut().back_to_back = true;
    let before = game.score();

    let events = game.step(0, &tap_hard_drop());
    assert_eq!(
        find_lock(&events),
        Some((PieceKind::S, TSpinKind::None, 0, false))
    );
    assert_eq!(lock_score(&events), None);
    assert_eq!(game.combo(), 0);
    assert!(game.b2b_active());
    // Only the hard drop scored.
    assert_eq!(game.score(), before + 2 * 18);
}

#[test]
fn scenario_perfect_clear_tetris() {
    let mut game = game(Board::from_ascii(&["XXXXXXXXX."; 4]), &[PieceKind::I]);
    steer_i_to_right_wall(&mut game);

    let events = game.step(0, &tap_hard_drop());
    assert_eq!(
        find_lock(&events),
        Some((PieceKind::I, TSpinKind::None, 4, true))
    );
    assert_eq!(
        lock_score(&events),
        Some((2000, "Tetris Perfect Clear".to_string()))
    );
    assert!(game.board().is_empty());
    assert_eq!(game.perfect_clear_count(), 1);
    assert!(game.b2b_active());
}

#[test]
fn scenario_lock_reset_limit() {
    let mut game = game(Board::new(), &[PieceKind::O]);
    game.set_active(Piece {
        kind: PieceKind::O,
        rotation: Rotation::Spawn,
        x: 3,
        y: 18,
    });
    game.step(0, &InputSnapshot::IDLE);
    assert!(game.is_on_ground());

    for n in 1..=LOCK_RESET_LIMIT {
        let events = game.step(100, &tap_cw());
        assert!(matches!(events[0], Event::Rotate { .. }));
        assert_eq!(game.lock_resets(), n);
        assert_eq!(game.lock_timer_ms(), 100);
    }

    // Rotations keep working but no longer buy time.
    for elapsed in [200, 300, 400] {
        let events = game.step(100, &tap_cw());
        assert!(matches!(events[0], Event::Rotate { .. }));
        assert_eq!(find_lock(&events), None);
        assert_eq!(game.lock_resets(), LOCK_RESET_LIMIT);
        assert_eq!(game.lock_timer_ms(), elapsed);
    }

    let events = game.step(100, &tap_cw());
    assert!(matches!(events[0], Event::Rotate { .. }));
    assert_eq!(
        find_lock(&events),
        Some((PieceKind::O, TSpinKind::None, 0, false))
    );
    assert_eq!(game.pieces_locked(), 1);
}

#[test]
fn lines_crossing_a_multiple_of_ten_level_up() {
    let mut game = game(Board::from_ascii(&["XXXXXXXXX."]), &[PieceKind::I]);
    game.scoring_mut().lines = 9;
    steer_i_to_right_wall(&mut game);

    let events = game.step(0, &tap_hard_drop());
    assert!(events.contains(&Event::LevelUp { level: 2 }));
    // Points use the level before the clear.
    assert_eq!(lock_score(&events), Some((100, "Single".to_string())));
    assert_eq!(game.level(), 2);
}

#[test]
fn zero_line_lock_on_empty_board_is_not_perfect_clear() {
    let mut game = game(Board::new(), &[PieceKind::I]);
    let events = game.step(0, &tap_hard_drop());
    assert_eq!(
        find_lock(&events),
        Some((PieceKind::I, TSpinKind::None, 0, false))
    );
    assert_eq!(game.perfect_clear_count(), 0);
}

#[test]
fn spawn_into_stack_is_block_out() {
    // Columns 4 and 5 are stacked up to row 2, leaving exactly one O of room.
    let mut game = game(
        Board::from_ascii(&["....XX...."; 18]),
        &[PieceKind::O, PieceKind::O],
    );
    let events = game.step(0, &tap_hard_drop());
    assert_eq!(
        events.last(),
        Some(&Event::GameOver {
            reason: GameOverReason::BlockOut
        })
    );
    assert!(game.step(16, &InputSnapshot::IDLE).is_empty());
}

/// Pseudo-random key mashing from a fixed seed.
fn random_inputs(seed: u64, count: usize) -> Vec<(u32, InputSnapshot)> {
    let mut rng = SimpleRng::new(seed);
    let mut prev = crate::types::HeldKeys::default();
    (0..count)
        .map(|_| {
            let bits = rng.next_u32();
            let now = crate::types::HeldKeys {
                left: bits & 0x3 == 0,
                right: bits & 0xc == 0,
                soft_drop: bits & 0x30 == 0,
                hard_drop: bits & 0x7c0 == 0,
                rotate_cw: bits & 0x1800 == 0,
                rotate_ccw: bits & 0x6000 == 0,
                hold: bits & 0x1f8000 == 0,
            };
            let snapshot = InputSnapshot::from_transition(prev, now);
            prev = now;
            let dt = 8 + rng.next_range(25);
            (dt, snapshot)
        })
        .collect()
}

#[test]
fn identical_inputs_replay_identically() {
    let inputs = random_inputs(77, 3000);
    let mut a = GameState::new(4242);
    let mut b = GameState::new(4242);
    for (dt, snapshot) in &inputs {
        assert_eq!(a.step(*dt, snapshot), b.step(*dt, snapshot));
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert!(a.pieces_locked() > 0);
}

#[test]
fn invariants_hold_under_random_play() {
    for seed in [1u64, 2, 3] {
        let mut game = GameState::new(seed);
        let mut last_score = 0;
        let mut chain = 0u32;
        for (dt, snapshot) in random_inputs(seed * 31, 4000) {
            let events = game.step(dt, &snapshot);

            if let Some((_, tspin, lines, _)) = find_lock(&events) {
                if lines > 0 {
                    chain += 1;
                    assert_eq!(game.combo(), chain);
                } else if !tspin.is_spin() {
                    chain = 0;
                }
            }

            let board = game.board();
            for y in 0..board.height() as usize {
                assert!(!board.is_row_full(y), "seed {seed}: full row {y}");
            }
            assert!(game.lock_resets() <= LOCK_RESET_LIMIT);
            assert_eq!(game.level(), 1 + game.lines() / 10);
            assert!(game.score() >= last_score);
            last_score = game.score();

            if let Some(piece) = game.current_piece() {
                assert!(piece.is_valid(game.board()));
            }
        }
    }
}
