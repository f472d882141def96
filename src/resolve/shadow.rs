//! Shadow casting.
//!
//! The sun shines from one of six directions each day. A tree of size `s`
//! casts a shadow over the `s` cells behind it, walking the neighbor chain
//! in the sun direction. Seeds cast nothing.

use crate::board::{Board, GameState, DIRECTION_COUNT};

/// Sun direction for photosynthesis on `day`.
#[inline]
pub const fn sun_direction(day: u8) -> usize {
    day as usize % DIRECTION_COUNT
}

/// Sun direction of the day after `day`, used when planning growth.
#[inline]
pub const fn next_sun_direction(day: u8) -> usize {
    (day as usize + 1) % DIRECTION_COUNT
}

/// Returns, for each cell, whether any tree shadows it in `direction`.
pub fn shadowed_cells(board: &Board, state: &GameState, direction: usize) -> Vec<bool> {
    shadow_heights(board, state, direction)
        .into_iter()
        .map(|h| h > 0)
        .collect()
}

/// Returns, for each cell, the size of the tallest tree shadowing it in
/// `direction` (0 when unshadowed).
pub fn shadow_heights(board: &Board, state: &GameState, direction: usize) -> Vec<u8> {
    let mut heights = vec![0u8; board.len()];
    for tree in state.trees() {
        if tree.size == 0 {
            continue;
        }
        for cell in board.ray(tree.cell, direction).take(tree.size as usize) {
            if heights[cell] < tree.size {
                heights[cell] = tree.size;
            }
        }
    }
    heights
}

/// Returns true if a tree of `size` on a cell with shadow `height` is
/// blocked from gathering sun.
#[inline]
pub const fn is_spooky(size: u8, height: u8) -> bool {
    height > 0 && height >= size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Player, Tree, LARGE, MEDIUM, SEED, SMALL};

    fn count(mask: &[bool]) -> usize {
        mask.iter().filter(|s| **s).count()
    }

    #[test]
    fn seed_casts_no_shadow() {
        let board = Board::standard();
        let mut state = GameState::empty(board.len());
        state.place_tree(Tree::new(0, SEED, Player::Me));
        for d in 0..DIRECTION_COUNT {
            assert_eq!(count(&shadowed_cells(&board, &state, d)), 0);
        }
    }

    #[test]
    fn large_tree_on_center_shadows_three_cells_in_line() {
        let board = Board::standard();
        let mut state = GameState::empty(board.len());
        state.place_tree(Tree::new(0, LARGE, Player::Me));
        for d in 0..DIRECTION_COUNT {
            let mask = shadowed_cells(&board, &state, d);
            assert_eq!(count(&mask), 3);
            let expected: Vec<usize> = board.ray(0, d).take(3).collect();
            for cell in expected {
                assert!(mask[cell], "cell {} should be shadowed in dir {}", cell, d);
            }
        }
    }

    #[test]
    fn shadow_stops_at_board_edge() {
        let board = Board::standard();
        let mut state = GameState::empty(board.len());
        // Cell 7 is on ring 2: only one cell lies beyond it in direction 0.
        state.place_tree(Tree::new(7, LARGE, Player::Opponent));
        assert_eq!(count(&shadowed_cells(&board, &state, 0)), 1);
    }

    #[test]
    fn taller_shadow_dominates() {
        let board = Board::standard();
        let mut state = GameState::empty(board.len());
        // Center large tree and a small tree on cell 1, both shading in direction 0.
        state.place_tree(Tree::new(0, LARGE, Player::Me));
        state.place_tree(Tree::new(1, SMALL, Player::Opponent));
        let heights = shadow_heights(&board, &state, 0);
        assert_eq!(heights[1], LARGE);
        assert_eq!(heights[7], LARGE);
        assert_eq!(heights[19], LARGE);
        assert_eq!(heights[0], 0);
    }

    #[test]
    fn spooky_needs_equal_or_taller_shadow() {
        assert!(!is_spooky(SMALL, 0));
        assert!(is_spooky(SMALL, SMALL));
        assert!(is_spooky(SMALL, LARGE));
        assert!(!is_spooky(LARGE, MEDIUM));
    }

    #[test]
    fn next_direction_wraps() {
        assert_eq!(sun_direction(0), 0);
        assert_eq!(sun_direction(7), 1);
        assert_eq!(next_sun_direction(5), 0);
        assert_eq!(next_sun_direction(20), 3);
    }
}
