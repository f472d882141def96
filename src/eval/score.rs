//! Final scoring.

use serde::Serialize;

use crate::board::{GameState, Player};

/// Sun points are worth one point per this many at game end.
pub const SUN_PER_POINT: u32 = 3;

/// Result of a finished (or truncated) game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win(Player),
    Draw,
}

impl Outcome {
    /// The winning player, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Win(player) => Some(player),
            Outcome::Draw => None,
        }
    }
}

/// Harvest score plus one point per three leftover sun.
#[inline]
pub fn final_score(state: &GameState, player: Player) -> u32 {
    let p = state.player(player);
    p.score + p.sun / SUN_PER_POINT
}

/// Compares final scores. Equal scores are a draw.
pub fn outcome(state: &GameState) -> Outcome {
    let me = final_score(state, Player::Me);
    let opponent = final_score(state, Player::Opponent);
    match me.cmp(&opponent) {
        std::cmp::Ordering::Greater => Outcome::Win(Player::Me),
        std::cmp::Ordering::Less => Outcome::Win(Player::Opponent),
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}
