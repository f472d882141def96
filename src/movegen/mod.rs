//! Legal action generation.
//!
//! Generates the full set of legal actions for one player from a game
//! state: WAIT, every affordable seed throw, every affordable growth, and
//! every affordable harvest.

pub mod seed;

use rand::Rng;

use crate::board::{Action, Board, GameState, Player, LARGE};
use crate::resolve::cost::{grow_cost, seed_cost, COMPLETE_COST};

pub use seed::{can_seed_to, in_seed_range, seed_targets};

/// Generates all legal actions for `player`. WAIT is always first.
///
/// A sleeping player may only WAIT. Otherwise each owned, non-dormant tree
/// contributes its seed throws (size > 0, sun >= seed cost), its growth
/// (size < 3, sun >= growth cost) or its harvest (size 3, sun >= 4).
pub fn legal_actions(board: &Board, state: &GameState, player: Player) -> Vec<Action> {
    let mut actions = vec![Action::Wait];
    let me = state.player(player);
    if me.is_waiting {
        return actions;
    }

    let sun = me.sun;
    let can_afford_seed = seed_cost(state, player) <= sun;

    for tree in state.trees_of(player) {
        if tree.is_dormant {
            continue;
        }

        if can_afford_seed && tree.size > 0 {
            for target in seed_targets(board, state, tree) {
                actions.push(Action::Seed {
                    source: tree.cell,
                    target,
                });
            }
        }

        if tree.size < LARGE {
            if let Some(cost) = grow_cost(state, player, tree.size) {
                if cost <= sun {
                    actions.push(Action::Grow { target: tree.cell });
                }
            }
        } else if sun >= COMPLETE_COST {
            actions.push(Action::Complete { target: tree.cell });
        }
    }

    actions
}

/// Picks one legal action for `player` uniformly at random.
pub fn random_action(
    board: &Board,
    state: &GameState,
    player: Player,
    rng: &mut impl Rng,
) -> Action {
    let legal = legal_actions(board, state, player);
    legal[rng.gen_range(0..legal.len())]
}
