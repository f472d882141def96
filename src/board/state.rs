//! Game state representation.
//!
//! A per-turn snapshot: day, nutrient pool, both players' sun and score,
//! the trees on the board and the legal actions offered to the engine.
//! Trees are stored in a dense per-cell array for O(1) lookup.

use super::action::Action;
use super::tree::{Player, Tree, ALL_PLAYERS};

/// Number of days in a game (days 0..=23).
pub const DAY_COUNT: u8 = 24;

/// Nutrient pool at the start of a game.
pub const STARTING_NUTRIENTS: u8 = 20;

/// Sun, score and sleep flag for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlayerState {
    pub sun: u32,
    pub score: u32,
    /// Asleep until the next day.
    pub is_waiting: bool,
}

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub day: u8,
    pub nutrients: u8,
    /// Indexed by `Player::index()`.
    pub players: [PlayerState; 2],
    /// Tree at each cell, indexed by cell index.
    pub trees: Vec<Option<Tree>>,
    /// Legal actions for `Player::Me` this turn.
    pub legal_actions: Vec<Action>,
}

impl GameState {
    /// Creates an empty day-0 state for a board with `cell_count` cells.
    pub fn empty(cell_count: usize) -> Self {
        GameState {
            day: 0,
            nutrients: STARTING_NUTRIENTS,
            players: [PlayerState::default(); 2],
            trees: vec![None; cell_count],
            legal_actions: vec![Action::Wait],
        }
    }

    #[inline]
    pub fn player(&self, player: Player) -> &PlayerState {
        &self.players[player.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, player: Player) -> &mut PlayerState {
        &mut self.players[player.index()]
    }

    #[inline]
    pub fn sun(&self, player: Player) -> u32 {
        self.players[player.index()].sun
    }

    /// Returns the tree at `cell`, if any.
    #[inline]
    pub fn tree_at(&self, cell: usize) -> Option<&Tree> {
        self.trees.get(cell).and_then(|t| t.as_ref())
    }

    #[inline]
    pub fn tree_at_mut(&mut self, cell: usize) -> Option<&mut Tree> {
        self.trees.get_mut(cell).and_then(|t| t.as_mut())
    }

    /// Returns true if a tree stands on `cell`.
    #[inline]
    pub fn is_occupied(&self, cell: usize) -> bool {
        self.tree_at(cell).is_some()
    }

    /// Places a tree. Returns false if the cell is occupied or off the board.
    pub fn place_tree(&mut self, tree: Tree) -> bool {
        match self.trees.get_mut(tree.cell) {
            Some(slot @ None) => {
                *slot = Some(tree);
                true
            }
            _ => false,
        }
    }

    /// Removes and returns the tree at `cell`.
    pub fn remove_tree(&mut self, cell: usize) -> Option<Tree> {
        self.trees.get_mut(cell).and_then(|t| t.take())
    }

    /// Iterates over all trees in cell order.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter().flatten()
    }

    /// Iterates over the trees owned by `player` in cell order.
    pub fn trees_of(&self, player: Player) -> impl Iterator<Item = &Tree> {
        self.trees().filter(move |t| t.owner == player)
    }

    /// Counts the trees of the given size owned by `player`.
    pub fn count_trees(&self, player: Player, size: u8) -> usize {
        self.trees_of(player).filter(|t| t.size == size).count()
    }

    /// Returns true if `action` is in this turn's legal action list.
    #[inline]
    pub fn is_legal(&self, action: &Action) -> bool {
        self.legal_actions.contains(action)
    }

    /// Returns the same position seen from the other player's chair.
    ///
    /// Player records are swapped and tree owners flipped. The legal action
    /// list is cleared to WAIT; callers regenerate it for the new viewer.
    pub fn mirrored(&self) -> GameState {
        let mut mirrored = self.clone();
        mirrored.players.swap(0, 1);
        for tree in mirrored.trees.iter_mut().flatten() {
            tree.owner = tree.owner.other();
        }
        mirrored.legal_actions = vec![Action::Wait];
        mirrored
    }

    /// Returns this state as seen by `player` (a copy for `Me`, a mirror
    /// for `Opponent`).
    pub fn perspective(&self, player: Player) -> GameState {
        match player {
            Player::Me => self.clone(),
            Player::Opponent => self.mirrored(),
        }
    }

    /// Returns true if every player is asleep.
    pub fn all_waiting(&self) -> bool {
        ALL_PLAYERS.iter().all(|p| self.player(*p).is_waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tree::{LARGE, SEED, SMALL};

    #[test]
    fn empty_state_has_no_trees() {
        let state = GameState::empty(37);
        assert_eq!(state.trees.len(), 37);
        assert_eq!(state.trees().count(), 0);
        assert_eq!(state.day, 0);
        assert_eq!(state.nutrients, STARTING_NUTRIENTS);
        assert_eq!(state.legal_actions, vec![Action::Wait]);
    }

    #[test]
    fn place_tree_rejects_occupied_and_out_of_range() {
        let mut state = GameState::empty(37);
        assert!(state.place_tree(Tree::new(5, SMALL, Player::Me)));
        assert!(!state.place_tree(Tree::new(5, SEED, Player::Opponent)));
        assert!(!state.place_tree(Tree::new(37, SEED, Player::Me)));
        assert_eq!(state.tree_at(5).map(|t| t.owner), Some(Player::Me));
    }

    #[test]
    fn remove_tree_clears_cell() {
        let mut state = GameState::empty(37);
        state.place_tree(Tree::new(5, LARGE, Player::Me));
        let removed = state.remove_tree(5);
        assert_eq!(removed.map(|t| t.size), Some(LARGE));
        assert!(!state.is_occupied(5));
        assert_eq!(state.remove_tree(5), None);
    }

    #[test]
    fn count_trees_by_owner_and_size() {
        let mut state = GameState::empty(37);
        state.place_tree(Tree::new(1, SMALL, Player::Me));
        state.place_tree(Tree::new(2, SMALL, Player::Me));
        state.place_tree(Tree::new(3, SMALL, Player::Opponent));
        state.place_tree(Tree::new(4, SEED, Player::Me));
        assert_eq!(state.count_trees(Player::Me, SMALL), 2);
        assert_eq!(state.count_trees(Player::Opponent, SMALL), 1);
        assert_eq!(state.count_trees(Player::Me, SEED), 1);
        assert_eq!(state.count_trees(Player::Me, LARGE), 0);
    }

    #[test]
    fn mirrored_swaps_players_and_owners() {
        let mut state = GameState::empty(37);
        state.players[0].sun = 7;
        state.players[1].score = 12;
        state.players[1].is_waiting = true;
        state.place_tree(Tree::new(1, SMALL, Player::Me));
        state.place_tree(Tree::new(2, LARGE, Player::Opponent));

        let mirror = state.mirrored();
        assert_eq!(mirror.sun(Player::Opponent), 7);
        assert_eq!(mirror.player(Player::Me).score, 12);
        assert!(mirror.player(Player::Me).is_waiting);
        assert_eq!(mirror.tree_at(1).map(|t| t.owner), Some(Player::Opponent));
        assert_eq!(mirror.tree_at(2).map(|t| t.owner), Some(Player::Me));

        let back = mirror.mirrored();
        assert_eq!(back.players, state.players);
        assert_eq!(back.trees, state.trees);
    }

    #[test]
    fn all_waiting_needs_both() {
        let mut state = GameState::empty(7);
        state.player_mut(Player::Me).is_waiting = true;
        assert!(!state.all_waiting());
        state.player_mut(Player::Opponent).is_waiting = true;
        assert!(state.all_waiting());
    }
}
