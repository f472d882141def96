//! Board representation and game-state types.
//!
//! Contains the hex cell topology, trees, actions, and the per-turn
//! game state.

pub mod action;
pub mod cell;
pub mod state;
pub mod tree;

pub use action::Action;
pub use cell::{
    ring_of, Board, BoardError, Cell, DIRECTION_COUNT, MAX_RICHNESS, RING_COUNT,
    STANDARD_CELL_COUNT,
};
pub use state::{GameState, PlayerState, DAY_COUNT, STARTING_NUTRIENTS};
pub use tree::{Player, Tree, ALL_PLAYERS, LARGE, MEDIUM, SEED, SMALL};
