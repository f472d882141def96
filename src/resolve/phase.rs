//! Turn and day sequencing.
//!
//! Applies actions to a game state and advances days. Two entry points
//! cover the two ways the game is played:
//!
//! - `apply_turn` resolves one simultaneous turn for both players, as the
//!   referee does (used by self-play).
//! - `apply_ply` applies a single player's action and ends the day once
//!   both players sleep (the alternating model used by the search).
//!
//! A day ends when both players are waiting: the day counter advances,
//! dormancy and sleep reset, and every tree outside a tall enough shadow
//! gathers sun equal to its size.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{
    Action, Board, GameState, Player, Tree, ALL_PLAYERS, DAY_COUNT, LARGE, SEED, SMALL,
};
use crate::movegen::{can_seed_to, in_seed_range, legal_actions};

use super::cost::{action_cost, grow_cost, seed_cost, COMPLETE_COST};
use super::shadow::{is_spooky, shadow_heights, sun_direction};

/// Extra harvest points indexed by cell richness.
pub const RICHNESS_BONUS: [u32; 4] = [0, 0, 2, 4];

/// Number of small trees each player starts with.
pub const STARTING_TREES: usize = 2;

/// Reasons an action cannot be applied.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,

    #[error("{} is asleep until the next day", .0.name())]
    Asleep(Player),

    #[error("cell {0} is not on the board")]
    UnknownCell(usize),

    #[error("no tree of the acting player on cell {0}")]
    NotOwnTree(usize),

    #[error("tree on cell {0} is dormant")]
    Dormant(usize),

    #[error("tree on cell {cell} has size {size} and cannot {verb}")]
    WrongSize {
        cell: usize,
        size: u8,
        verb: &'static str,
    },

    #[error("cell {target} cannot be seeded from cell {origin}")]
    InvalidSeedTarget { origin: usize, target: usize },

    #[error("not enough sun: need {needed}, have {available}")]
    NotEnoughSun { needed: u32, available: u32 },
}

/// Returns true once the last day has ended.
#[inline]
pub fn is_game_over(state: &GameState) -> bool {
    state.day >= DAY_COUNT
}

/// Checks that `player` may perform `action` in `state`.
pub fn validate_action(
    board: &Board,
    state: &GameState,
    player: Player,
    action: &Action,
) -> Result<(), ActionError> {
    if is_game_over(state) {
        return Err(ActionError::GameOver);
    }
    if action.is_wait() {
        return Ok(());
    }
    if state.player(player).is_waiting {
        return Err(ActionError::Asleep(player));
    }

    match *action {
        Action::Wait => Ok(()),
        Action::Seed { source, target } => {
            check_cell(board, target)?;
            let tree = own_active_tree(board, state, player, source)?;
            if tree.size == SEED {
                return Err(ActionError::WrongSize {
                    cell: source,
                    size: tree.size,
                    verb: "seed",
                });
            }
            if !in_seed_range(board, tree, target)
                || !can_seed_to(board, state, player, source, target)
            {
                return Err(ActionError::InvalidSeedTarget {
                    origin: source,
                    target,
                });
            }
            afford(state, player, seed_cost(state, player))
        }
        Action::Grow { target } => {
            let tree = own_active_tree(board, state, player, target)?;
            let cost = grow_cost(state, player, tree.size).ok_or(ActionError::WrongSize {
                cell: target,
                size: tree.size,
                verb: "grow",
            })?;
            afford(state, player, cost)
        }
        Action::Complete { target } => {
            let tree = own_active_tree(board, state, player, target)?;
            if tree.size != LARGE {
                return Err(ActionError::WrongSize {
                    cell: target,
                    size: tree.size,
                    verb: "complete",
                });
            }
            afford(state, player, COMPLETE_COST)
        }
    }
}

fn check_cell(board: &Board, cell: usize) -> Result<(), ActionError> {
    if board.contains(cell) {
        Ok(())
    } else {
        Err(ActionError::UnknownCell(cell))
    }
}

fn own_active_tree<'a>(
    board: &Board,
    state: &'a GameState,
    player: Player,
    cell: usize,
) -> Result<&'a Tree, ActionError> {
    check_cell(board, cell)?;
    let tree = state
        .tree_at(cell)
        .filter(|t| t.owner == player)
        .ok_or(ActionError::NotOwnTree(cell))?;
    if tree.is_dormant {
        return Err(ActionError::Dormant(cell));
    }
    Ok(tree)
}

fn afford(state: &GameState, player: Player, needed: u32) -> Result<(), ActionError> {
    let available = state.sun(player);
    if needed > available {
        return Err(ActionError::NotEnoughSun { needed, available });
    }
    Ok(())
}

/// Error for an action that has no cost, which only a GROW of a missing,
/// foreign or large tree can be.
fn cannot_grow(state: &GameState, player: Player, action: &Action) -> ActionError {
    let cell = match *action {
        Action::Seed { target, .. } | Action::Grow { target } | Action::Complete { target } => {
            target
        }
        Action::Wait => 0,
    };
    match state.tree_at(cell) {
        Some(tree) if tree.owner == player => ActionError::WrongSize {
            cell,
            size: tree.size,
            verb: "grow",
        },
        _ => ActionError::NotOwnTree(cell),
    }
}

/// Applies a validated action. Harvests score the current nutrient value;
/// the caller decrements the pool.
fn perform(
    board: &Board,
    state: &mut GameState,
    player: Player,
    action: &Action,
) -> Result<(), ActionError> {
    let cost = action_cost(state, player, action)
        .ok_or_else(|| cannot_grow(state, player, action))?;
    afford(state, player, cost)?;
    state.player_mut(player).sun -= cost;

    match *action {
        Action::Wait => {
            state.player_mut(player).is_waiting = true;
        }
        Action::Seed { source, target } => {
            if let Some(tree) = state.tree_at_mut(source) {
                tree.is_dormant = true;
            }
            state.place_tree(Tree::dormant(target, SEED, player));
        }
        Action::Grow { target } => {
            if let Some(tree) = state.tree_at_mut(target) {
                tree.size += 1;
                tree.is_dormant = true;
            }
        }
        Action::Complete { target } => {
            let gain = state.nutrients as u32 + RICHNESS_BONUS[board.richness(target) as usize];
            state.player_mut(player).score += gain;
            state.remove_tree(target);
        }
    }
    Ok(())
}

/// Validates and applies one action for `player`. Does not end the day.
pub fn apply_action(
    board: &Board,
    state: &mut GameState,
    player: Player,
    action: &Action,
) -> Result<(), ActionError> {
    validate_action(board, state, player, action)?;
    perform(board, state, player, action)?;
    if matches!(action, Action::Complete { .. }) {
        state.nutrients = state.nutrients.saturating_sub(1);
    }
    Ok(())
}

/// Applies one player's action in the alternating model, ending the day
/// when both players are asleep.
pub fn apply_ply(
    board: &Board,
    state: &mut GameState,
    player: Player,
    action: &Action,
) -> Result<(), ActionError> {
    apply_action(board, state, player, action)?;
    if state.all_waiting() {
        end_day(board, state);
    }
    Ok(())
}

/// Resolves one simultaneous turn. `actions` is indexed by `Player::index()`.
///
/// Both actions are validated against the state before either is applied.
/// Two seeds thrown at the same cell both fail: no sun is spent, but the
/// source trees still go dormant. Harvests in the same turn score the same
/// nutrient value, then the pool drops once per harvest.
pub fn apply_turn(
    board: &Board,
    state: &mut GameState,
    actions: [Action; 2],
) -> Result<(), ActionError> {
    for player in ALL_PLAYERS {
        validate_action(board, state, player, &actions[player.index()])?;
    }

    if let (
        Action::Seed {
            source: mine,
            target: a,
        },
        Action::Seed {
            source: theirs,
            target: b,
        },
    ) = (actions[0], actions[1])
    {
        if a == b {
            for cell in [mine, theirs] {
                if let Some(tree) = state.tree_at_mut(cell) {
                    tree.is_dormant = true;
                }
            }
            return Ok(());
        }
    }

    let harvests = actions
        .iter()
        .filter(|a| matches!(a, Action::Complete { .. }))
        .count() as u8;
    for player in ALL_PLAYERS {
        perform(board, state, player, &actions[player.index()])?;
    }
    state.nutrients = state.nutrients.saturating_sub(harvests);

    if state.all_waiting() {
        end_day(board, state);
    }
    Ok(())
}

/// Ends the current day. Unless the game is over, wakes every tree and
/// player and gathers sun for the new day.
pub fn end_day(board: &Board, state: &mut GameState) {
    state.day += 1;
    if is_game_over(state) {
        return;
    }
    for tree in state.trees.iter_mut().flatten() {
        tree.is_dormant = false;
    }
    for player in state.players.iter_mut() {
        player.is_waiting = false;
    }
    gather_sun(board, state);
}

/// Adds each tree's size to its owner's sun unless it stands in a shadow at
/// least as tall as itself.
pub fn gather_sun(board: &Board, state: &mut GameState) {
    let heights = shadow_heights(board, state, sun_direction(state.day));
    let mut gained = [0u32; 2];
    for tree in state.trees() {
        if tree.size > 0 && !is_spooky(tree.size, heights[tree.cell]) {
            gained[tree.owner.index()] += tree.size as u32;
        }
    }
    for player in ALL_PLAYERS {
        state.player_mut(player).sun += gained[player.index()];
    }
}

/// Sets up a new game: two small trees per player on point-symmetric edge
/// cells, day 0, first sun gathered, legal actions filled in for `Me`.
pub fn initial_state(board: &Board, rng: &mut impl Rng) -> GameState {
    let mut state = GameState::empty(board.len());

    let mut candidates: Vec<usize> = board
        .edge_cells()
        .filter(|&i| board.cell(i).is_usable())
        .filter(|&i| {
            board
                .opposite(i)
                .is_some_and(|o| o != i && board.cell(o).is_usable())
        })
        .collect();
    candidates.shuffle(rng);

    let mut placed = 0;
    for cell in candidates {
        if placed == STARTING_TREES {
            break;
        }
        let Some(opposite) = board.opposite(cell) else {
            continue;
        };
        if state.is_occupied(cell) || state.is_occupied(opposite) {
            continue;
        }
        state.place_tree(Tree::new(cell, SMALL, Player::Me));
        state.place_tree(Tree::new(opposite, SMALL, Player::Opponent));
        placed += 1;
    }

    gather_sun(board, &mut state);
    state.legal_actions = legal_actions(board, &state, Player::Me);
    state
}
