//! Self-play game generation.
//!
//! Plays full games between two engines on the standard board (optionally
//! with random symmetric holes), resolving simultaneous turns with the rules
//! simulator. Records every turn and the final result for offline analysis.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::{Action, Board, GameState, Player, ALL_PLAYERS};
use crate::engine::{Engine, EngineConfig, Strategy};
use crate::eval::{final_score, outcome, Outcome};
use crate::movegen::legal_actions;
use crate::protocol::format_action;
use crate::resolve::{apply_turn, initial_state, is_game_over};

/// Safety cap on turns per game.
pub const MAX_TURNS_PER_GAME: usize = 2000;

/// Most hole pairs a generated board may have.
pub const MAX_HOLE_PAIRS: usize = 10;

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Time budget per search (milliseconds).
    pub movetime_ms: u64,
    /// Strategy of the first seat.
    pub me: Strategy,
    /// Strategy of the second seat.
    pub opponent: Strategy,
    /// Pairs of symmetric unusable cells punched into each board.
    pub holes: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            movetime_ms: 50,
            me: Strategy::Mcts,
            opponent: Strategy::Heuristic,
            holes: 0,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// One simultaneous turn, recorded before it is applied.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub day: u8,
    pub nutrients: u8,
    /// Indexed by seat: `[me, opponent]`.
    pub sun: [u32; 2],
    pub score: [u32; 2],
    pub actions: [String; 2],
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub me: Strategy,
    pub opponent: Strategy,
    /// Unusable cells of the board.
    pub holes: Vec<usize>,
    pub turns: Vec<TurnRecord>,
    pub final_day: u8,
    pub final_scores: [u32; 2],
    pub outcome: Outcome,
}

/// Picks `pairs` random non-center cells whose point-symmetric partners are
/// not already chosen.
fn pick_holes(board: &Board, pairs: usize, rng: &mut SmallRng) -> Vec<usize> {
    let mut candidates: Vec<usize> = (1..board.len()).collect();
    candidates.shuffle(rng);

    let mut chosen = Vec::new();
    for cell in candidates {
        if chosen.len() == pairs.min(MAX_HOLE_PAIRS) {
            break;
        }
        let opposite = board.opposite(cell);
        if opposite == Some(cell) || chosen.iter().any(|&c| Some(c) == opposite) {
            continue;
        }
        chosen.push(cell);
    }
    chosen
}

fn seat_engine(board: &Board, strategy: Strategy, movetime_ms: u64, seed: u64) -> Engine {
    let config = EngineConfig {
        strategy,
        movetime_ms,
        first_turn_movetime_ms: movetime_ms,
        seed: Some(seed),
        verbose: false,
        ..EngineConfig::default()
    };
    Engine::new(board.clone(), config)
}

/// The state as `player` sees it, with that player's legal actions.
fn seat_view(board: &Board, state: &GameState, player: Player) -> GameState {
    let mut view = state.perspective(player);
    view.legal_actions = legal_actions(board, &view, Player::Me);
    view
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, rng: &mut SmallRng) -> GameRecord {
    let standard = Board::standard();
    let picked = pick_holes(&standard, config.holes, rng);
    let board = standard.with_holes(&picked);
    let holes: Vec<usize> = board
        .cells()
        .iter()
        .filter(|c| !c.is_usable())
        .map(|c| c.index)
        .collect();

    let mut state = initial_state(&board, rng);
    let mut seats = [
        seat_engine(&board, config.me, config.movetime_ms, rng.gen()),
        seat_engine(&board, config.opponent, config.movetime_ms, rng.gen()),
    ];
    let mut turns: Vec<TurnRecord> = Vec::new();

    while !is_game_over(&state) && turns.len() < MAX_TURNS_PER_GAME {
        let mut actions = [Action::Wait; 2];
        for player in ALL_PLAYERS {
            let view = seat_view(&board, &state, player);
            actions[player.index()] = seats[player.index()].decide(&view);
        }

        turns.push(TurnRecord {
            day: state.day,
            nutrients: state.nutrients,
            sun: ALL_PLAYERS.map(|p| state.sun(p)),
            score: ALL_PLAYERS.map(|p| state.player(p).score),
            actions: actions.map(|a| format_action(&a)),
        });

        if let Err(e) = apply_turn(&board, &mut state, actions) {
            eprintln!("game {}: day {}: {}", game_id, state.day, e);
            break;
        }
    }

    GameRecord {
        game_id,
        me: config.me,
        opponent: config.opponent,
        holes,
        turns,
        final_day: state.day,
        final_scores: ALL_PLAYERS.map(|p| final_score(&state, p)),
        outcome: outcome(&state),
    }
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win(p) => format!("{} wins", p.name()),
        Outcome::Draw => "draw".to_string(),
    }
}

fn report(game: &GameRecord, done: usize, total: usize, started: Instant) {
    eprintln!(
        "Game {}/{}: {} {}-{} after {} turns ({:.1}s)",
        done,
        total,
        describe(game.outcome),
        game.final_scores[0],
        game.final_scores[1],
        game.turns.len(),
        started.elapsed().as_secs_f64(),
    );
}

/// Runs self-play generation, producing multiple game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| games.push(game));
    games.sort_by_key(|g| g.game_id);
    games
}

/// Runs self-play generation, calling `on_game` with each completed game
/// record as it finishes.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F)
where
    F: FnMut(GameRecord),
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game);
    } else {
        run_self_play_sequential(config, on_game);
    }
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let started = Instant::now();
        let mut rng = game_rng(config.seed, i);
        let game = play_game(config, i, &mut rng);
        if !config.quiet {
            report(&game, i + 1, config.num_games, started);
        }
        on_game(game);
    }
}

/// Parallel self-play: plays games concurrently on a rayon pool and hands
/// them to the callback on the calling thread through a channel.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("selfplay: thread pool unavailable ({}), running sequentially", e);
            return run_self_play_sequential(config, on_game);
        }
    };

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    std::thread::scope(|scope| {
        let completed = &completed;
        scope.spawn(move || {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let started = Instant::now();
                        let mut rng = game_rng(config.seed, i);
                        let game = play_game(config, i, &mut rng);
                        if !config.quiet {
                            let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            report(&game, n, config.num_games, started);
                        }
                        let _ = tx.send(game);
                    });
            });
        });

        for game in rx {
            on_game(game);
        }
    });
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len();
    if total == 0 {
        eprintln!("No games played.");
        return;
    }

    let mut wins = [0usize; 2];
    let mut draws = 0usize;
    let mut scores = [0u64; 2];
    let mut turns = 0usize;
    for game in games {
        match game.outcome {
            Outcome::Win(p) => wins[p.index()] += 1,
            Outcome::Draw => draws += 1,
        }
        for p in ALL_PLAYERS {
            scores[p.index()] += game.final_scores[p.index()] as u64;
        }
        turns += game.turns.len();
    }

    let pct = |n: usize| n as f64 * 100.0 / total as f64;
    let seats = [games[0].me, games[0].opponent];
    eprintln!("--- Self-play summary ({} games) ---", total);
    for p in ALL_PLAYERS {
        let i = p.index();
        eprintln!(
            "  {:<8} ({:<9}) wins {:>4} ({:5.1}%)  avg score {:.1}",
            p.name(),
            seats[i].name(),
            wins[i],
            pct(wins[i]),
            scores[i] as f64 / total as f64,
        );
    }
    eprintln!("  draws {:>4} ({:5.1}%)", draws, pct(draws));
    eprintln!("  avg turns per game: {:.1}", turns as f64 / total as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DAY_COUNT;

    fn fast_config() -> SelfPlayConfig {
        SelfPlayConfig {
            num_games: 2,
            movetime_ms: 1,
            me: Strategy::Heuristic,
            opponent: Strategy::Heuristic,
            holes: 2,
            threads: 1,
            seed: 42,
            quiet: true,
        }
    }

    #[test]
    fn heuristic_game_runs_to_the_last_day() {
        let config = fast_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let game = play_game(&config, 0, &mut rng);
        assert_eq!(game.final_day, DAY_COUNT);
        assert!(!game.turns.is_empty());
        assert_eq!(game.holes.len(), 4);
        assert_eq!(game.turns[0].day, 0);
        match game.outcome {
            Outcome::Win(Player::Me) => assert!(game.final_scores[0] > game.final_scores[1]),
            Outcome::Win(Player::Opponent) => {
                assert!(game.final_scores[1] > game.final_scores[0])
            }
            Outcome::Draw => assert_eq!(game.final_scores[0], game.final_scores[1]),
        }
    }

    #[test]
    fn holes_are_symmetric_pairs() {
        let board = Board::standard();
        let mut rng = SmallRng::seed_from_u64(3);
        let holes = pick_holes(&board, 3, &mut rng);
        assert_eq!(holes.len(), 3);
        assert!(!holes.contains(&0));
        for &h in &holes {
            let opposite = board.opposite(h).unwrap();
            assert!(!holes.contains(&opposite));
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let config = fast_config();
        let a = run_self_play(&config);
        let b = run_self_play(&config);
        assert_eq!(a.len(), 2);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.final_scores, y.final_scores);
            assert_eq!(x.holes, y.holes);
            assert_eq!(x.turns.len(), y.turns.len());
        }
    }

    #[test]
    fn parallel_run_returns_every_game() {
        let config = SelfPlayConfig {
            num_games: 3,
            threads: 2,
            ..fast_config()
        };
        let games = run_self_play(&config);
        let ids: Vec<usize> = games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn jsonl_has_one_object_per_line() {
        let mut config = fast_config();
        config.num_games = 1;
        let games = run_self_play(&config);
        let mut out = Vec::new();
        write_jsonl(&games, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["game_id"], 0);
        assert_eq!(value["me"], "heuristic");
        assert!(value["turns"].as_array().is_some_and(|t| !t.is_empty()));
    }
}
