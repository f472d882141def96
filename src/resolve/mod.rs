//! Rules simulation.
//!
//! Prices actions, casts shadows, and applies actions to a game state,
//! advancing days and gathering sun.

pub mod cost;
pub mod phase;
pub mod shadow;

pub use cost::{action_cost, grow_cost, seed_cost, COMPLETE_COST, TREE_BASE_COST};
pub use phase::{
    apply_action, apply_ply, apply_turn, end_day, gather_sun, initial_state, is_game_over,
    validate_action, ActionError, RICHNESS_BONUS,
};
pub use shadow::{is_spooky, next_sun_direction, shadow_heights, shadowed_cells, sun_direction};
