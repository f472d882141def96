//! Priority-cascade policy.
//!
//! A fixed list of rules evaluated top to bottom; the first rule that
//! applies decides the action. Every candidate is checked against the
//! state's legal action list, so the result is always legal (WAIT when
//! nothing else is). Used on its own and as the search fallback.

use crate::board::{Action, Board, GameState, Player, Tree, LARGE, MEDIUM, SEED, SMALL};
use crate::movegen::seed_targets;
use crate::resolve::{next_sun_direction, shadowed_cells, COMPLETE_COST};

/// First day on which large trees are harvested unconditionally.
pub const ENDGAME_DAY: u8 = 20;

/// Number of owned large trees that triggers a mass harvest.
pub const MASS_HARVEST_TREES: usize = 4;

/// Picks an action for `Me` from `state`. Total and deterministic.
pub fn heuristic_action(board: &Board, state: &GameState) -> Action {
    let action = cascade(board, state);
    if state.is_legal(&action) {
        action
    } else {
        Action::Wait
    }
}

fn cascade(board: &Board, state: &GameState) -> Action {
    let me = Player::Me;
    let sun = state.sun(me);
    let legal = |action: Action| state.is_legal(&action).then_some(action);

    // Endgame harvest.
    if state.day >= ENDGAME_DAY && sun >= COMPLETE_COST {
        if let Some(tree) = richest(board, active(state, LARGE)) {
            if let Some(action) = legal(Action::Complete { target: tree.cell }) {
                return action;
            }
        }
    }

    // Bootstrap: nothing taller than a small tree yet.
    if !state.trees_of(me).any(|t| t.size >= MEDIUM) {
        for size in [SMALL, SEED] {
            if let Some(tree) = richest(board, active(state, size)) {
                if let Some(action) = legal(Action::Grow { target: tree.cell }) {
                    return action;
                }
            }
        }
        return Action::Wait;
    }

    // Grow whatever stays in the sun tomorrow, biggest and richest first.
    let shadow = shadowed_cells(board, state, next_sun_direction(state.day));
    let mut sunny: Vec<&Tree> = state
        .trees_of(me)
        .filter(|t| !t.is_dormant && t.size < LARGE && !shadow[t.cell])
        .collect();
    if !sunny.is_empty() {
        sunny.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then(board.richness(b.cell).cmp(&board.richness(a.cell)))
        });
        return sunny
            .iter()
            .find_map(|t| legal(Action::Grow { target: t.cell }))
            .unwrap_or(Action::Wait);
    }

    // Plant one seed at a time, from medium trees before large ones.
    if state.count_trees(me, SEED) == 0 {
        for size in [MEDIUM, LARGE] {
            if let Some(action) = best_seed(board, state, size) {
                return legal(action).unwrap_or(Action::Wait);
            }
        }
    }

    if state.count_trees(me, LARGE) >= MASS_HARVEST_TREES {
        return richest(board, active(state, LARGE))
            .filter(|_| sun >= COMPLETE_COST)
            .and_then(|t| legal(Action::Complete { target: t.cell }))
            .unwrap_or(Action::Wait);
    }

    richest(board, active(state, MEDIUM))
        .and_then(|t| legal(Action::Grow { target: t.cell }))
        .unwrap_or(Action::Wait)
}

/// Owned non-dormant trees of `size`, in cell order.
fn active(state: &GameState, size: u8) -> impl Iterator<Item = &Tree> {
    state
        .trees_of(Player::Me)
        .filter(move |t| t.is_active_for(Player::Me) && t.size == size)
}

/// The tree on the richest cell; the first one wins ties.
fn richest<'a>(board: &Board, trees: impl Iterator<Item = &'a Tree>) -> Option<&'a Tree> {
    trees.fold(None, |best: Option<&Tree>, tree| match best {
        Some(b) if board.richness(b.cell) >= board.richness(tree.cell) => Some(b),
        _ => Some(tree),
    })
}

/// Highest-richness seed throw from any active tree of `size`.
fn best_seed(board: &Board, state: &GameState, size: u8) -> Option<Action> {
    let mut best: Option<(u8, Action)> = None;
    for tree in active(state, size) {
        for target in seed_targets(board, state, tree) {
            let richness = board.richness(target);
            if best.map_or(true, |(r, _)| richness > r) {
                best = Some((
                    richness,
                    Action::Seed {
                        source: tree.cell,
                        target,
                    },
                ));
            }
        }
    }
    best.map(|(_, action)| action)
}
