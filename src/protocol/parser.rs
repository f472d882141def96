//! Startup and turn input reader.
//!
//! The referee sends the board once, then one block per turn. Every value
//! sits on its own line or on a line of space-separated integers; legal
//! actions use the action notation.

use std::io::BufRead;

use crate::board::{Board, BoardError, Cell, GameState, Player, Tree, DIRECTION_COUNT, LARGE};

use super::action::{parse_action, NotationError};

/// Errors raised while reading referee input.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unexpected end of input")]
    UnexpectedEof { line: usize },

    #[error("line {line}: expected {expected} integers in '{text}'")]
    MissingFields {
        line: usize,
        expected: usize,
        text: String,
    },

    #[error("line {line}: invalid integer '{token}'")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: {what} out of range: {value}")]
    OutOfRange {
        line: usize,
        what: &'static str,
        value: i64,
    },

    #[error("line {line}: more than one tree on cell {cell}")]
    DuplicateTree { line: usize, cell: usize },

    #[error("line {line}: {source}")]
    Notation { line: usize, source: NotationError },

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

/// Line reader over the referee's input stream.
pub struct InputReader<R> {
    input: R,
    buf: String,
    line: usize,
}

impl<R: BufRead> InputReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buf: String::new(),
            line: 0,
        }
    }

    /// Reads the next non-blank line into the buffer. Returns false on EOF.
    fn advance(&mut self) -> Result<bool, ProtocolError> {
        loop {
            self.buf.clear();
            if self.input.read_line(&mut self.buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            if !self.buf.trim().is_empty() {
                return Ok(true);
            }
        }
    }

    fn expect_line(&mut self) -> Result<(), ProtocolError> {
        if self.advance()? {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedEof { line: self.line + 1 })
        }
    }

    /// Parses the first `count` integers of the current line. Extra tokens
    /// are ignored.
    fn parse_fields(&self, count: usize) -> Result<Vec<i64>, ProtocolError> {
        let mut fields = Vec::with_capacity(count);
        for token in self.buf.split_whitespace().take(count) {
            let value = token.parse().map_err(|_| ProtocolError::InvalidNumber {
                line: self.line,
                token: token.to_string(),
            })?;
            fields.push(value);
        }
        if fields.len() < count {
            return Err(ProtocolError::MissingFields {
                line: self.line,
                expected: count,
                text: self.buf.trim().to_string(),
            });
        }
        Ok(fields)
    }

    fn fields(&mut self, count: usize) -> Result<Vec<i64>, ProtocolError> {
        self.expect_line()?;
        self.parse_fields(count)
    }

    fn number(&mut self) -> Result<i64, ProtocolError> {
        Ok(self.fields(1)?[0])
    }

    fn in_range(&self, what: &'static str, value: i64, max: i64) -> Result<i64, ProtocolError> {
        if (0..=max).contains(&value) {
            Ok(value)
        } else {
            Err(ProtocolError::OutOfRange {
                line: self.line,
                what,
                value,
            })
        }
    }

    /// Reads the startup block: cell count, then one line per cell with
    /// `index richness n0..n5` (`-1` for no neighbor). Returns `None` if
    /// the input ends before the block starts.
    pub fn read_board(&mut self) -> Result<Option<Board>, ProtocolError> {
        if !self.advance()? {
            return Ok(None);
        }
        let count = self.parse_fields(1)?[0];
        let count = self.in_range("cell count", count, u16::MAX as i64)? as usize;

        let mut cells = Vec::with_capacity(count);
        for _ in 0..count {
            let f = self.fields(2 + DIRECTION_COUNT)?;
            let index = self.in_range("cell index", f[0], count as i64 - 1)? as usize;
            let richness = self.in_range("richness", f[1], u8::MAX as i64)? as u8;
            let mut neighbors = [None; DIRECTION_COUNT];
            for (slot, &n) in neighbors.iter_mut().zip(&f[2..]) {
                if n >= 0 {
                    *slot = Some(n as usize);
                }
            }
            cells.push(Cell {
                index,
                richness,
                neighbors,
            });
        }
        Ok(Some(Board::from_cells(cells)?))
    }

    /// Reads one turn block. Returns `None` if the input ends cleanly
    /// before the block starts.
    pub fn read_turn(&mut self, board: &Board) -> Result<Option<GameState>, ProtocolError> {
        if !self.advance()? {
            return Ok(None);
        }
        let mut state = GameState::empty(board.len());

        let day = self.parse_fields(1)?[0];
        state.day = self.in_range("day", day, u8::MAX as i64)? as u8;
        let nutrients = self.number()?;
        state.nutrients = self.in_range("nutrients", nutrients, u8::MAX as i64)? as u8;

        let points = u32::MAX as i64;
        let f = self.fields(2)?;
        let sun = self.in_range("sun", f[0], points)? as u32;
        let score = self.in_range("score", f[1], points)? as u32;
        let me = state.player_mut(Player::Me);
        me.sun = sun;
        me.score = score;

        let f = self.fields(3)?;
        let sun = self.in_range("opponent sun", f[0], points)? as u32;
        let score = self.in_range("opponent score", f[1], points)? as u32;
        let opponent = state.player_mut(Player::Opponent);
        opponent.sun = sun;
        opponent.score = score;
        opponent.is_waiting = f[2] != 0;

        let trees = self.number()?;
        let trees = self.in_range("tree count", trees, board.len() as i64)?;
        for _ in 0..trees {
            let f = self.fields(4)?;
            let cell = self.in_range("tree cell", f[0], board.len() as i64 - 1)? as usize;
            let size = self.in_range("tree size", f[1], LARGE as i64)? as u8;
            let owner = if f[2] != 0 {
                Player::Me
            } else {
                Player::Opponent
            };
            let tree = Tree {
                cell,
                size,
                owner,
                is_dormant: f[3] != 0,
            };
            if !state.place_tree(tree) {
                return Err(ProtocolError::DuplicateTree {
                    line: self.line,
                    cell,
                });
            }
        }

        let actions = self.number()?;
        let actions = self.in_range("action count", actions, u16::MAX as i64)?;
        state.legal_actions.clear();
        for _ in 0..actions {
            self.expect_line()?;
            let action = parse_action(&self.buf).map_err(|source| ProtocolError::Notation {
                line: self.line,
                source,
            })?;
            state.legal_actions.push(action);
        }

        Ok(Some(state))
    }
}
