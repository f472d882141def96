//! Integration tests for the canopy bot binary.
//!
//! Spawns the bot, feeds it a board and turn blocks on stdin, and checks
//! the action lines it prints on stdout.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use canopy::board::{Action, Board, GameState, Player};
use canopy::movegen::legal_actions;
use canopy::protocol::{format_action, parse_action};
use canopy::resolve::{apply_ply, initial_state};

/// Feeds `input` to the bot and returns its stdout lines and exit success.
fn run_bot(input: &str) -> (Vec<String>, bool) {
    let exe = env!("CARGO_BIN_EXE_canopy");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start canopy");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    stdin.write_all(input.as_bytes()).unwrap();
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    (lines, status.success())
}

fn board_block(board: &Board) -> String {
    let mut out = format!("{}\n", board.len());
    for cell in board.cells() {
        out.push_str(&format!("{} {}", cell.index, cell.richness));
        for n in cell.neighbors {
            out.push_str(&format!(" {}", n.map_or(-1, |n| n as i64)));
        }
        out.push('\n');
    }
    out
}

fn turn_block(state: &GameState) -> String {
    let me = state.player(Player::Me);
    let opponent = state.player(Player::Opponent);
    let mut out = format!(
        "{}\n{}\n{} {}\n{} {} {}\n",
        state.day,
        state.nutrients,
        me.sun,
        me.score,
        opponent.sun,
        opponent.score,
        opponent.is_waiting as u8
    );
    let trees: Vec<_> = state.trees().collect();
    out.push_str(&format!("{}\n", trees.len()));
    for t in trees {
        out.push_str(&format!(
            "{} {} {} {}\n",
            t.cell,
            t.size,
            (t.owner == Player::Me) as u8,
            t.is_dormant as u8
        ));
    }
    out.push_str(&format!("{}\n", state.legal_actions.len()));
    for action in &state.legal_actions {
        out.push_str(&format_action(action));
        out.push('\n');
    }
    out
}

fn opening(board: &Board) -> GameState {
    initial_state(board, &mut SmallRng::seed_from_u64(4))
}

#[test]
fn answers_every_turn_with_a_legal_action() {
    let board = Board::standard();
    let first = opening(&board);

    // Second turn: a new day, and one of our trees has just grown.
    let mut second = first.clone();
    let mine = first.trees_of(Player::Me).next().unwrap().cell;
    apply_ply(&board, &mut second, Player::Me, &Action::Wait).unwrap();
    apply_ply(&board, &mut second, Player::Opponent, &Action::Wait).unwrap();
    second.players[0].sun += 6;
    apply_ply(&board, &mut second, Player::Me, &Action::Grow { target: mine }).unwrap();
    second.legal_actions = legal_actions(&board, &second, Player::Me);

    let input = board_block(&board) + &turn_block(&first) + &turn_block(&second);
    let (lines, ok) = run_bot(&input);
    assert!(ok);
    assert_eq!(lines.len(), 2, "one line per turn: {:?}", lines);

    for (line, state) in lines.iter().zip([&first, &second]) {
        let action = parse_action(line).expect("bot printed a malformed action");
        assert!(state.is_legal(&action), "{} not offered", line);
    }
}

#[test]
fn only_wait_offered_means_wait() {
    let board = Board::standard();
    let mut state = opening(&board);
    state.legal_actions = vec![Action::Wait];
    let (lines, ok) = run_bot(&(board_block(&board) + &turn_block(&state)));
    assert!(ok);
    assert_eq!(lines, vec!["WAIT".to_string()]);
}

#[test]
fn empty_input_exits_cleanly() {
    let (lines, ok) = run_bot("");
    assert!(ok);
    assert!(lines.is_empty());
}

#[test]
fn malformed_turn_is_fatal() {
    let board = Board::standard();
    let input = board_block(&board) + "3\n20\nnot numbers\n";
    let (lines, ok) = run_bot(&input);
    assert!(!ok);
    assert!(lines.is_empty());
}

#[test]
fn truncated_board_is_fatal() {
    let (lines, ok) = run_bot("37\n0 3 1 2 3 4 5 6\n");
    assert!(!ok);
    assert!(lines.is_empty());
}
