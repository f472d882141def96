//! Decision making.
//!
//! A deterministic rule cascade that answers instantly, and a Monte-Carlo
//! tree search that uses the remaining time and falls back to it.

pub mod heuristic;
pub mod mcts;

pub use heuristic::heuristic_action;
pub use mcts::{
    playout, search, search_iterations, SearchInfo, SearchResult, EXPLORATION,
    MAX_PLAYOUT_PLIES, WIN_SCORE,
};
