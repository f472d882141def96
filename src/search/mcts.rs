//! Monte-Carlo tree search with UCT selection.
//!
//! The simultaneous game is modelled as alternating plies: every node
//! records the player whose action led to it (`mover`), and the player to
//! act is the other one. The root's mover is the opponent, so `Me` acts
//! first. Each iteration selects a leaf by UCT, expands it with every
//! legal action, plays one uniformly random game to the end from a new
//! child, and credits the winner's nodes on the way back up.
//!
//! The tree lives in an arena owned by the search call and is dropped
//! when it returns.

use std::io::Write;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::board::{Action, Board, GameState, Player};
use crate::eval::{outcome, Outcome};
use crate::movegen::{legal_actions, random_action};
use crate::resolve::{apply_ply, is_game_over};

use super::heuristic::heuristic_action;

/// UCT exploration constant.
pub const EXPLORATION: f64 = 1.41;

/// Score credited to every node whose mover won the playout.
pub const WIN_SCORE: f64 = 10.0;

/// Upper bound on plies in one random playout.
pub const MAX_PLAYOUT_PLIES: usize = 1000;

/// Search statistics emitted via `info` lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchInfo {
    pub iterations: u64,
    pub nodes: usize,
    pub best_visits: u32,
    pub elapsed_ms: u64,
}

/// Result of a search: the chosen action and how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub action: Action,
    /// True when the search had nothing usable and the heuristic decided.
    pub from_heuristic: bool,
    pub info: SearchInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    action: Action,
    mover: Player,
    state: GameState,
    visits: u32,
    win_score: f64,
    children: Vec<NodeId>,
}

impl Node {
    /// UCT value seen from the parent. Unvisited nodes come first.
    fn uct(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = self.visits as f64;
        self.win_score / visits + exploration * ((parent_visits as f64).ln() / visits).sqrt()
    }
}

/// Arena of search nodes. The root is always node 0.
#[derive(Debug)]
struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    fn new(mut state: GameState) -> Self {
        state.legal_actions.clear();
        let root = Node {
            parent: None,
            action: Action::Wait,
            mover: Player::Opponent,
            state,
            visits: 0,
            win_score: 0.0,
            children: Vec::new(),
        };
        SearchTree { nodes: vec![root] }
    }

    const ROOT: NodeId = NodeId(0);

    #[inline]
    fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Applies `action` for the player to act at `parent` and links the
    /// resulting node. Actions the rules reject produce no child.
    fn add_child(&mut self, board: &Board, parent: NodeId, action: Action) -> Option<NodeId> {
        let node = self.get(parent);
        let mover = node.mover.other();
        let mut state = node.state.clone();
        apply_ply(board, &mut state, mover, &action).ok()?;

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: Some(parent),
            action,
            mover,
            state,
            visits: 0,
            win_score: 0.0,
            children: Vec::new(),
        });
        self.get_mut(parent).children.push(id);
        Some(id)
    }

    /// Descends from the root to a node without children.
    fn select(&self, exploration: f64) -> NodeId {
        let mut current = Self::ROOT;
        loop {
            let node = self.get(current);
            let mut best: Option<(NodeId, f64)> = None;
            for &child in &node.children {
                let value = self.get(child).uct(node.visits, exploration);
                if best.map_or(true, |(_, b)| value > b) {
                    best = Some((child, value));
                }
            }
            match best {
                Some((child, _)) => current = child,
                None => return current,
            }
        }
    }

    /// Creates one child per legal action of the player to act at `leaf`.
    fn expand(&mut self, board: &Board, leaf: NodeId) {
        let node = self.get(leaf);
        if is_game_over(&node.state) {
            return;
        }
        for action in legal_actions(board, &node.state, node.mover.other()) {
            self.add_child(board, leaf, action);
        }
    }

    fn backpropagate(&mut self, leaf: NodeId, result: Outcome) {
        let winner = result.winner();
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            if winner == Some(node.mover) {
                node.win_score += WIN_SCORE;
            }
            current = node.parent;
        }
    }

    /// Root child with the most visits; the first one wins ties.
    fn robust_child(&self) -> Option<&Node> {
        let mut best: Option<&Node> = None;
        for &id in &self.get(Self::ROOT).children {
            let child = self.get(id);
            if best.map_or(true, |b| child.visits > b.visits) {
                best = Some(child);
            }
        }
        best
    }
}

/// Plays uniformly random legal actions until the game ends or the ply cap
/// is hit, then compares final scores. A rules error ends the playout as a
/// draw.
pub fn playout(
    board: &Board,
    mut state: GameState,
    mut player: Player,
    rng: &mut impl Rng,
) -> Outcome {
    for _ in 0..MAX_PLAYOUT_PLIES {
        if is_game_over(&state) {
            break;
        }
        let action = random_action(board, &state, player, rng);
        if apply_ply(board, &mut state, player, &action).is_err() {
            return Outcome::Draw;
        }
        player = player.other();
    }
    outcome(&state)
}

enum Budget {
    Deadline(Instant),
    Iterations(u64),
}

impl Budget {
    #[inline]
    fn exhausted(&self, done: u64) -> bool {
        match *self {
            Budget::Deadline(deadline) => Instant::now() >= deadline,
            Budget::Iterations(limit) => done >= limit,
        }
    }
}

/// Searches for `Me`'s action until `movetime` has elapsed.
///
/// The root's children are the actions in `state.legal_actions`. Emits one
/// `info` line to `out` when done.
pub fn search<W: Write>(
    board: &Board,
    state: &GameState,
    movetime: Duration,
    exploration: f64,
    rng: &mut impl Rng,
    out: &mut W,
) -> SearchResult {
    let start = Instant::now();
    let budget = Budget::Deadline(start + movetime);
    let result = run(board, state, budget, exploration, rng, start);
    let _ = writeln!(
        out,
        "info iterations {} nodes {} visits {} time {}{}",
        result.info.iterations,
        result.info.nodes,
        result.info.best_visits,
        result.info.elapsed_ms,
        if result.from_heuristic { " fallback" } else { "" }
    );
    result
}

/// Runs exactly `iterations` iterations. Deterministic for a seeded `rng`.
pub fn search_iterations(
    board: &Board,
    state: &GameState,
    iterations: u64,
    exploration: f64,
    rng: &mut impl Rng,
) -> SearchResult {
    run(board, state, Budget::Iterations(iterations), exploration, rng, Instant::now())
}

fn run(
    board: &Board,
    state: &GameState,
    budget: Budget,
    exploration: f64,
    rng: &mut impl Rng,
    start: Instant,
) -> SearchResult {
    let mut tree = SearchTree::new(state.clone());
    for &action in &state.legal_actions {
        tree.add_child(board, SearchTree::ROOT, action);
    }

    let mut iterations = 0u64;
    while !budget.exhausted(iterations) {
        let leaf = tree.select(exploration);
        let first_child = tree.len();
        tree.expand(board, leaf);
        let target = if tree.len() > first_child {
            NodeId(rng.gen_range(first_child..tree.len()) as u32)
        } else {
            leaf
        };

        let node = tree.get(target);
        let result = playout(board, node.state.clone(), node.mover.other(), rng);
        tree.backpropagate(target, result);
        iterations += 1;
    }

    let mut info = SearchInfo {
        iterations,
        nodes: tree.len(),
        best_visits: 0,
        elapsed_ms: 0,
    };

    let chosen = tree
        .robust_child()
        .filter(|_| iterations > 0)
        .filter(|child| state.is_legal(&child.action))
        .map(|child| (child.action, child.visits));

    let result = match chosen {
        Some((action, visits)) => {
            info.best_visits = visits;
            SearchResult {
                action,
                from_heuristic: false,
                info,
            }
        }
        None => SearchResult {
            action: heuristic_action(board, state),
            from_heuristic: true,
            info,
        },
    };
    SearchResult {
        info: SearchInfo {
            elapsed_ms: start.elapsed().as_millis() as u64,
            ..result.info
        },
        ..result
    }
}
