//! Trees and their owners.

use serde::Serialize;

/// Size of a freshly planted seed.
pub const SEED: u8 = 0;
/// Size of a small tree.
pub const SMALL: u8 = 1;
/// Size of a medium tree.
pub const MEDIUM: u8 = 2;
/// Size of a large tree, the only size that can be harvested.
pub const LARGE: u8 = 3;

/// One of the two players, seen from the engine's side of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Me,
    Opponent,
}

/// Both players, in index order.
pub const ALL_PLAYERS: [Player; 2] = [Player::Me, Player::Opponent];

impl Player {
    /// Returns the other player.
    #[inline]
    pub const fn other(self) -> Player {
        match self {
            Player::Me => Player::Opponent,
            Player::Opponent => Player::Me,
        }
    }

    /// Index into per-player arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::Me => 0,
            Player::Opponent => 1,
        }
    }

    /// Lowercase display name.
    pub const fn name(self) -> &'static str {
        match self {
            Player::Me => "me",
            Player::Opponent => "opponent",
        }
    }
}

/// A tree occupying one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tree {
    pub cell: usize,
    /// 0 = seed .. 3 = large.
    pub size: u8,
    pub owner: Player,
    /// Set once the tree has acted or was planted this day.
    pub is_dormant: bool,
}

impl Tree {
    /// Creates an active (non-dormant) tree.
    pub const fn new(cell: usize, size: u8, owner: Player) -> Self {
        Tree {
            cell,
            size,
            owner,
            is_dormant: false,
        }
    }

    /// Creates a dormant tree.
    pub const fn dormant(cell: usize, size: u8, owner: Player) -> Self {
        Tree {
            cell,
            size,
            owner,
            is_dormant: true,
        }
    }

    /// Returns true if this tree belongs to `player` and may still act today.
    #[inline]
    pub const fn is_active_for(&self, player: Player) -> bool {
        self.owner as u8 == player as u8 && !self.is_dormant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_player_flips() {
        assert_eq!(Player::Me.other(), Player::Opponent);
        assert_eq!(Player::Opponent.other(), Player::Me);
        assert_eq!(Player::Me.other().other(), Player::Me);
    }

    #[test]
    fn player_indices_match_all_players() {
        for (i, p) in ALL_PLAYERS.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn active_requires_owner_and_awake() {
        let tree = Tree::new(4, MEDIUM, Player::Me);
        assert!(tree.is_active_for(Player::Me));
        assert!(!tree.is_active_for(Player::Opponent));
        let sleeping = Tree::dormant(4, MEDIUM, Player::Me);
        assert!(!sleeping.is_active_for(Player::Me));
    }

    #[test]
    fn player_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Player::Opponent).unwrap(), "\"opponent\"");
    }
}
