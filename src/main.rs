//! Canopy -- a forest-growth game bot.
//!
//! Reads the board once from stdin, then one turn block at a time, and
//! answers each turn with a single action line on stdout. Diagnostics go
//! to stderr.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use canopy::engine::{Engine, EngineConfig};
use canopy::protocol::{InputReader, ProtocolError};

/// Runs the turn loop until the referee closes the input.
fn run<R: BufRead, W: Write>(reader: &mut InputReader<R>, out: &mut W) -> Result<(), ProtocolError> {
    let Some(board) = reader.read_board()? else {
        return Ok(());
    };
    eprintln!("board: {} cells", board.len());

    let mut engine = Engine::new(board, EngineConfig::default());
    while let Some(state) = reader.read_turn(engine.board())? {
        engine.handle_turn(&state, out)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = InputReader::new(stdin.lock());
    let mut out = io::BufWriter::new(stdout.lock());

    match run(&mut reader, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}
