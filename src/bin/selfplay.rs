//! Self-play game generation CLI.
//!
//! Plays engine-vs-engine games and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N        Number of games to play (default: 10)
//!   --movetime MS    Search time per move in ms (default: 50)
//!   --me S           First seat strategy, heuristic|mcts (default: mcts)
//!   --opponent S     Second seat strategy (default: heuristic)
//!   --holes N        Symmetric hole pairs per board (default: 0)
//!   --threads N      Number of parallel threads (default: 4)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use canopy::selfplay::{self, SelfPlayConfig};

/// Parses the value following a flag.
fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = args
        .get(i)
        .ok_or_else(|| format!("missing value for {}", flag))?;
    raw.parse()
        .map_err(|_| format!("invalid {} value: '{}'", flag, raw))
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let parsed = match flag {
            "--games" => value(&args, i + 1, flag).map(|v| config.num_games = v),
            "--movetime" => value(&args, i + 1, flag).map(|v| config.movetime_ms = v),
            "--me" => value(&args, i + 1, flag).map(|v| config.me = v),
            "--opponent" => value(&args, i + 1, flag).map(|v| config.opponent = v),
            "--holes" => value(&args, i + 1, flag).map(|v| config.holes = v),
            "--threads" => value(&args, i + 1, flag).map(|v| config.threads = v),
            "--seed" => value(&args, i + 1, flag).map(|v| config.seed = v),
            "--output" => value(&args, i + 1, flag).map(|v| output_path = Some(v)),
            "--quiet" => {
                config.quiet = true;
                i += 1;
                continue;
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => Err(format!("unknown argument: {}", other)),
        };
        if let Err(e) = parsed {
            eprintln!("{}", e);
            print_usage();
            return ExitCode::from(2);
        }
        i += 2;
    }

    if !config.quiet {
        eprintln!(
            "Self-play: {} games, {} vs {}, {}ms/move, {} hole pairs, {} threads",
            config.num_games,
            config.me,
            config.opponent,
            config.movetime_ms,
            config.holes,
            config.threads
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config);
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s ({:.1} games/hour)",
            games.len(),
            elapsed.as_secs_f64(),
            games.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON) * 3600.0
        );
        selfplay::print_summary(&games);
    }

    let written = match &output_path {
        Some(path) => File::create(path)
            .and_then(|file| selfplay::write_jsonl(&games, &mut BufWriter::new(file))),
        None => {
            let stdout = io::stdout();
            selfplay::write_jsonl(&games, &mut BufWriter::new(stdout.lock()))
        }
    };
    if let Err(e) = written {
        eprintln!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }
    if let (Some(path), false) = (&output_path, config.quiet) {
        eprintln!("Wrote {} games to {}", games.len(), path);
    }
    ExitCode::SUCCESS
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --movetime MS    Search time per move in ms (default: 50)");
    eprintln!("  --me S           First seat strategy, heuristic|mcts (default: mcts)");
    eprintln!("  --opponent S     Second seat strategy (default: heuristic)");
    eprintln!("  --holes N        Symmetric hole pairs per board (default: 0)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
