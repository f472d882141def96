//! Engine state management.
//!
//! Holds the board for the whole game plus the engine configuration, and
//! turns each parsed turn into exactly one legal action line. The search
//! tree never outlives a turn; only the board, configuration and RNG do.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::{Action, Board, GameState};
use crate::protocol::format_action;
use crate::search::{heuristic_action, search, EXPLORATION};

/// Search time per turn in milliseconds (90% of the 100 ms turn limit).
pub const DEFAULT_MOVETIME_MS: u64 = 90;

/// Search time for the first turn, which has a 1 s limit.
pub const FIRST_TURN_MOVETIME_MS: u64 = 900;

/// How the engine picks its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Rule cascade only.
    Heuristic,
    /// Tree search with the rule cascade as fallback.
    Mcts,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Heuristic => "heuristic",
            Strategy::Mcts => "mcts",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heuristic" => Ok(Strategy::Heuristic),
            "mcts" => Ok(Strategy::Mcts),
            other => Err(format!("unknown strategy '{}' (heuristic|mcts)", other)),
        }
    }
}

/// Engine options. Fixed for the lifetime of a process.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub strategy: Strategy,
    pub movetime_ms: u64,
    pub first_turn_movetime_ms: u64,
    pub exploration: f64,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Write search `info` lines to stderr.
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Mcts,
            movetime_ms: DEFAULT_MOVETIME_MS,
            first_turn_movetime_ms: FIRST_TURN_MOVETIME_MS,
            exploration: EXPLORATION,
            seed: None,
            verbose: true,
        }
    }
}

/// Decides one action per turn for a fixed board.
pub struct Engine {
    board: Board,
    config: EngineConfig,
    rng: SmallRng,
    turns: u32,
}

impl Engine {
    pub fn new(board: Board, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Engine {
            board,
            config,
            rng,
            turns: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of turns decided so far.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Search time for the next decision.
    fn movetime(&self) -> Duration {
        let ms = if self.turns == 0 {
            self.config.first_turn_movetime_ms
        } else {
            self.config.movetime_ms
        };
        Duration::from_millis(ms)
    }

    /// Picks an action from `state.legal_actions`, or WAIT.
    pub fn decide(&mut self, state: &GameState) -> Action {
        let action = match self.config.strategy {
            Strategy::Heuristic => heuristic_action(&self.board, state),
            Strategy::Mcts => {
                let movetime = self.movetime();
                let exploration = self.config.exploration;
                let result = if self.config.verbose {
                    let mut err = io::stderr();
                    search(&self.board, state, movetime, exploration, &mut self.rng, &mut err)
                } else {
                    search(&self.board, state, movetime, exploration, &mut self.rng, &mut io::sink())
                };
                result.action
            }
        };
        self.turns += 1;

        if state.is_legal(&action) {
            action
        } else {
            if !action.is_wait() {
                eprintln!("engine: {} is not a legal action, waiting", format_action(&action));
            }
            Action::Wait
        }
    }

    /// Decides and writes one action line to `out`.
    pub fn handle_turn<W: Write>(&mut self, state: &GameState, out: &mut W) -> io::Result<()> {
        let action = self.decide(state);
        writeln!(out, "{}", format_action(&action))?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;
    use crate::movegen::legal_actions;
    use crate::resolve::initial_state;

    fn quiet(strategy: Strategy) -> EngineConfig {
        EngineConfig {
            strategy,
            movetime_ms: 5,
            first_turn_movetime_ms: 10,
            seed: Some(7),
            verbose: false,
            ..EngineConfig::default()
        }
    }

    fn opening(board: &Board) -> GameState {
        initial_state(board, &mut SmallRng::seed_from_u64(0))
    }

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.strategy, Strategy::Mcts);
        assert_eq!(config.movetime_ms, DEFAULT_MOVETIME_MS);
        assert_eq!(config.first_turn_movetime_ms, FIRST_TURN_MOVETIME_MS);
        assert_eq!(config.exploration, EXPLORATION);
    }

    #[test]
    fn strategy_parses_and_prints() {
        assert_eq!("mcts".parse::<Strategy>(), Ok(Strategy::Mcts));
        assert_eq!("heuristic".parse::<Strategy>(), Ok(Strategy::Heuristic));
        assert!("random".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Heuristic.to_string(), "heuristic");
    }

    #[test]
    fn first_turn_gets_longer_budget() {
        let board = Board::standard();
        let mut engine = Engine::new(board.clone(), quiet(Strategy::Heuristic));
        assert_eq!(engine.movetime(), Duration::from_millis(10));
        engine.decide(&opening(&board));
        assert_eq!(engine.turns(), 1);
        assert_eq!(engine.movetime(), Duration::from_millis(5));
    }

    #[test]
    fn decisions_are_legal_for_both_strategies() {
        let board = Board::standard();
        let state = opening(&board);
        for strategy in [Strategy::Heuristic, Strategy::Mcts] {
            let mut engine = Engine::new(board.clone(), quiet(strategy));
            let action = engine.decide(&state);
            assert!(state.is_legal(&action), "{}: {:?}", strategy, action);
        }
    }

    #[test]
    fn unlisted_actions_become_wait() {
        let board = Board::standard();
        let mut state = opening(&board);
        // Only WAIT offered even though the generator would allow more.
        assert!(legal_actions(&board, &state, Player::Me).len() > 1);
        state.legal_actions = vec![Action::Wait];
        let mut engine = Engine::new(board, quiet(Strategy::Mcts));
        assert_eq!(engine.decide(&state), Action::Wait);
    }

    #[test]
    fn handle_turn_writes_one_line() {
        let board = Board::standard();
        let state = opening(&board);
        let mut engine = Engine::new(board, quiet(Strategy::Heuristic));
        let mut out = Vec::new();
        engine.handle_turn(&state, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));
    }
}
