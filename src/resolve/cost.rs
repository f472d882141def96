//! Sun-point costs.
//!
//! Every cost grows with the number of same-sized trees the player already
//! owns, so costs are recomputed from the state on each call.

use crate::board::{Action, GameState, Player, LARGE, SEED};

/// Base cost indexed by the size being created (seed, small, medium, large).
pub const TREE_BASE_COST: [u32; 4] = [0, 1, 3, 7];

/// Fixed cost of harvesting a large tree.
pub const COMPLETE_COST: u32 = 4;

/// Cost of planting a seed: one per seed the player already owns.
pub fn seed_cost(state: &GameState, player: Player) -> u32 {
    TREE_BASE_COST[SEED as usize] + state.count_trees(player, SEED) as u32
}

/// Cost of growing a tree of `size` owned by `player` into `size + 1`.
///
/// Returns `None` for large trees, which are harvested instead.
pub fn grow_cost(state: &GameState, player: Player, size: u8) -> Option<u32> {
    if size >= LARGE {
        return None;
    }
    let target = size + 1;
    Some(TREE_BASE_COST[target as usize] + state.count_trees(player, target) as u32)
}

/// Sun cost of `action` for `player`. WAIT is free.
///
/// Returns `None` for GROW when `target` holds no tree of `player`'s that
/// can still grow.
pub fn action_cost(state: &GameState, player: Player, action: &Action) -> Option<u32> {
    match *action {
        Action::Wait => Some(0),
        Action::Seed { .. } => Some(seed_cost(state, player)),
        Action::Grow { target } => state
            .tree_at(target)
            .filter(|t| t.owner == player)
            .and_then(|t| grow_cost(state, player, t.size)),
        Action::Complete { .. } => Some(COMPLETE_COST),
    }
}
