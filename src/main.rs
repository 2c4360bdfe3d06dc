//! Headless Tetris runner (default binary).
//!
//! Reads one line of held keys per frame from stdin and prints every engine
//! event as a JSON line, followed by a summary of the final state.

use std::io;

use anyhow::Result;

use srs_tetris::headless::{parse_args, run};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = parse_args(&args)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&cfg, stdin.lock(), stdout.lock())?;
    Ok(())
}
