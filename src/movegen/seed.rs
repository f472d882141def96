//! Seed reach.
//!
//! A tree can throw a seed as far as its size in hex steps. The target must
//! be usable, empty, and not crowded by another tree of the same player.

use crate::board::{Board, GameState, Player, Tree};

/// Returns true if `player` may plant on `target` from the tree on `source`.
///
/// The target must have richness > 0, hold no tree, and have no direct
/// neighbor holding a tree of `player` other than the source tree itself.
pub fn can_seed_to(
    board: &Board,
    state: &GameState,
    player: Player,
    source: usize,
    target: usize,
) -> bool {
    if !board.cell(target).is_usable() || state.is_occupied(target) {
        return false;
    }
    board
        .cell(target)
        .neighbor_indices()
        .filter(|&n| n != source)
        .all(|n| !matches!(state.tree_at(n), Some(t) if t.owner == player))
}

/// Returns every valid seed target for `tree`, ignoring cost and dormancy.
///
/// Targets are ordered by distance, then by ring-expansion order.
pub fn seed_targets(board: &Board, state: &GameState, tree: &Tree) -> Vec<usize> {
    if tree.size == 0 {
        return Vec::new();
    }
    board
        .cells_within(tree.cell, tree.size as usize)
        .into_iter()
        .filter(|&target| can_seed_to(board, state, tree.owner, tree.cell, target))
        .collect()
}

/// Returns true if `target` lies within seeding range of `tree`.
pub fn in_seed_range(board: &Board, tree: &Tree, target: usize) -> bool {
    tree.size > 0 && board.cells_within(tree.cell, tree.size as usize).contains(&target)
}
