//! Headless runner: held keys per frame on stdin, events as JSON lines on stdout.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::core::{GameConfig, GameSnapshot, GameState, Seed};
use crate::types::{HeldKeys, InputSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessConfig {
    pub seed: u64,
    pub game: GameConfig,
    pub frame_ms: u32,
    /// Run exactly this many frames; otherwise run until input ends.
    pub frames: Option<u32>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            game: GameConfig::default(),
            frame_ms: 16,
            frames: None,
        }
    }
}

/// Final line written after the event stream.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub frames: u32,
    pub snapshot: &'a GameSnapshot,
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn parse_ms(v: &str, flag: &str) -> Result<u32> {
    v.parse::<u32>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

pub fn parse_args(args: &[String]) -> Result<HeadlessConfig> {
    let mut cfg = HeadlessConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--seed" => {
                i += 1;
                let v = flag_value(args, i, flag)?;
                let Seed(seed) = v
                    .parse()
                    .map_err(|e| anyhow!("invalid --seed value {:?}: {}", v, e))?;
                cfg.seed = seed;
            }
            "--das" => {
                i += 1;
                cfg.game = cfg.game.with_das(parse_ms(flag_value(args, i, flag)?, flag)?);
            }
            "--arr" => {
                i += 1;
                cfg.game = cfg.game.with_arr(parse_ms(flag_value(args, i, flag)?, flag)?);
            }
            "--frame-ms" => {
                i += 1;
                cfg.frame_ms = parse_ms(flag_value(args, i, flag)?, flag)?;
            }
            "--frames" => {
                i += 1;
                cfg.frames = Some(parse_ms(flag_value(args, i, flag)?, flag)?);
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(cfg)
}

/// Parse one frame of held keys, e.g. `"lx"` for left plus rotate clockwise.
pub fn parse_held_keys(line: &str) -> Result<HeldKeys> {
    let mut keys = HeldKeys::default();
    for c in line.chars().filter(|c| !c.is_whitespace()) {
        match c {
            'l' => keys.left = true,
            'r' => keys.right = true,
            's' => keys.soft_drop = true,
            'h' => keys.hard_drop = true,
            'x' => keys.rotate_cw = true,
            'z' => keys.rotate_ccw = true,
            'c' => keys.hold = true,
            other => return Err(anyhow!("unknown key {:?} in frame {:?}", other, line)),
        }
    }
    Ok(keys)
}

/// Drive a game from `input` and write its events to `out`.
///
/// Stops at game over, at the end of input, or after `frames` frames
/// (missing lines count as no keys held).
pub fn run<R: BufRead, W: Write>(
    cfg: &HeadlessConfig,
    input: R,
    mut out: W,
) -> Result<GameSnapshot> {
    let mut game = GameState::with_config(cfg.seed, cfg.game)
        .map_err(|e| anyhow!("cannot start game: {}", e))?;

    let mut lines = input.lines();
    let mut prev = HeldKeys::default();
    let mut events = Vec::new();
    let mut frame = 0u32;

    loop {
        if cfg.frames.is_some_and(|n| frame >= n) {
            break;
        }
        let now = match lines.next() {
            Some(line) => {
                let line = line.context("read input frame")?;
                parse_held_keys(&line)?
            }
            None if cfg.frames.is_some() => HeldKeys::default(),
            None => break,
        };

        events.clear();
        game.step_into(
            cfg.frame_ms,
            &InputSnapshot::from_transition(prev, now),
            &mut events,
        );
        for event in &events {
            serde_json::to_writer(&mut out, event)?;
            out.write_all(b"\n")?;
        }
        prev = now;
        frame += 1;

        if game.is_game_over() {
            break;
        }
    }

    let snapshot = game.snapshot();
    serde_json::to_writer(
        &mut out,
        &Summary {
            frames: frame,
            snapshot: &snapshot,
        },
    )?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(snapshot)
}
