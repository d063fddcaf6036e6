//! UCI front end.
//!
//! Two threads: the reader (this module's `run`) parses stdin lines, and a
//! worker owns the board and the searcher. The channel between them is the
//! single wait primitive; between commands the worker blocks on `recv`.
//! `stop` is an atomic flag the reader flips while a search runs, read by
//! the search's periodic probe, so no shared search state is ever touched
//! from the reader side.

use crate::board::Board;
use crate::error::EngineError;
use crate::eval::strength::{MAX_ELO, MIN_ELO};
use crate::moves::movegen::legal_moves;
use crate::moves::perft::perft;
use crate::moves::types::Move;
use crate::search::Searcher;
use crate::search::time::SearchLimits;
use crate::search::tt::TranspositionTable;
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use tracing::debug;

pub const ENGINE_NAME: &str = "Tempo";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_HASH_MB: usize = 64;
const MAX_HASH_MB: usize = 4096;
const MAX_MULTIPV: usize = 64;

enum Command {
    NewGame,
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go(SearchLimits),
    SetOption {
        name: String,
        value: String,
    },
    Perft(u32),
    Display,
    Quit,
}

/// Reader loop; returns on `quit` or closed stdin.
pub fn run() {
    // Table construction is front-loaded so the first `go` pays nothing.
    once_cell::sync::Lazy::force(&crate::attacks::ATTACKS);
    once_cell::sync::Lazy::force(&crate::board::geometry::GEOMETRY);
    crate::hash::zobrist::zobrist_keys();

    let stop = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<Command>();
    let worker_stop = stop.clone();
    let worker = thread::spawn(move || worker_loop(rx, worker_stop));

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            continue;
        };

        match command {
            "uci" => print_identity(),
            "isready" => println!("readyok"),
            "ucinewgame" => send(&tx, Command::NewGame),
            "position" => match parse_position(&tokens[1..]) {
                Ok((fen, moves)) => send(&tx, Command::SetPosition { fen, moves }),
                Err(err) => println!("info string {err}"),
            },
            "go" => {
                stop.store(false, Ordering::Relaxed);
                send(&tx, Command::Go(parse_go(&tokens[1..])));
            }
            "stop" => stop.store(true, Ordering::Relaxed),
            "setoption" => {
                if let Some((name, value)) = parse_setoption(&tokens[1..]) {
                    send(&tx, Command::SetOption { name, value });
                }
            }
            "perft" => {
                let depth = tokens.get(1).and_then(|t| t.parse().ok()).unwrap_or(1);
                send(&tx, Command::Perft(depth));
            }
            "d" | "display" => send(&tx, Command::Display),
            "quit" => {
                stop.store(true, Ordering::Relaxed);
                send(&tx, Command::Quit);
                break;
            }
            _ => debug!(command, "ignoring unknown command"),
        }
    }

    let _ = worker.join();
}

fn send(tx: &mpsc::Sender<Command>, command: Command) {
    // A dead worker means we are shutting down anyway.
    let _ = tx.send(command);
}

fn print_identity() {
    println!("id name {ENGINE_NAME} {ENGINE_VERSION}");
    println!("id author the {ENGINE_NAME} authors");
    println!("option name Hash type spin default {DEFAULT_HASH_MB} min 1 max {MAX_HASH_MB}");
    println!("option name MultiPV type spin default 1 min 1 max {MAX_MULTIPV}");
    println!("option name UCI_LimitStrength type check default false");
    println!("option name UCI_Elo type spin default {MAX_ELO} min {MIN_ELO} max {MAX_ELO}");
    println!("option name ClearHash type button");
    println!("option name TruncatePV type check default true");
    println!("uciok");
}

fn worker_loop(rx: mpsc::Receiver<Command>, stop: Arc<AtomicBool>) {
    let mut board = Board::new();
    let mut searcher = Searcher::new(DEFAULT_HASH_MB);
    let mut limit_strength = false;
    let mut elo = MAX_ELO;

    for command in rx {
        match command {
            Command::Quit => break,
            Command::NewGame => {
                board = Board::new();
                searcher.new_game();
            }
            Command::SetPosition { fen, moves } => {
                if let Err(err) = apply_position(&mut board, fen.as_deref(), &moves) {
                    println!("info string {err}");
                }
            }
            Command::SetOption { name, value } => match name.to_lowercase().as_str() {
                "hash" => {
                    let mb = value
                        .parse::<usize>()
                        .unwrap_or(DEFAULT_HASH_MB)
                        .clamp(1, MAX_HASH_MB);
                    searcher.tt = TranspositionTable::new(mb);
                }
                "clearhash" => searcher.tt.reset(),
                "multipv" => {
                    searcher.multipv = value.parse::<usize>().unwrap_or(1).clamp(1, MAX_MULTIPV);
                }
                "uci_limitstrength" => {
                    limit_strength = value.eq_ignore_ascii_case("true");
                    searcher.eval.strength.set(limit_strength, elo);
                }
                "uci_elo" => {
                    elo = value.parse::<i32>().unwrap_or(MAX_ELO);
                    searcher.eval.strength.set(limit_strength, elo);
                }
                "truncatepv" => {
                    searcher.truncate_pv = value.eq_ignore_ascii_case("true");
                }
                other => debug!(option = other, "ignoring unknown option"),
            },
            Command::Go(limits) => {
                let result = searcher.find_best_move(&mut board, &limits, stop.clone());
                if result.best_move.is_null() {
                    println!("bestmove 0000");
                } else {
                    println!("bestmove {}", result.best_move.to_uci());
                }
            }
            Command::Perft(depth) => {
                let start = Instant::now();
                let nodes = perft(&mut board, depth);
                let millis = start.elapsed().as_millis().max(1);
                println!(
                    "info string perft {depth} = {nodes} nodes in {millis} ms ({} knps)",
                    nodes as u128 / millis
                );
            }
            Command::Display => print!("{}", board.pretty()),
        }
    }
}

/// `position [startpos | fen <FEN>] [moves m1 m2 ...]`
pub fn parse_position(tokens: &[&str]) -> Result<(Option<String>, Vec<String>), EngineError> {
    let moves_at = tokens.iter().position(|&t| t == "moves");
    let setup = &tokens[..moves_at.unwrap_or(tokens.len())];
    let moves = moves_at
        .map(|i| tokens[i + 1..].iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    let fen = match setup.first() {
        Some(&"startpos") | None => None,
        Some(&"fen") => {
            if setup.len() < 2 {
                return Err(EngineError::ParseError("fen keyword without fields".into()));
            }
            Some(setup[1..].join(" "))
        }
        Some(other) => {
            return Err(EngineError::ParseError(format!(
                "expected startpos or fen, found '{other}'"
            )));
        }
    };
    Ok((fen, moves))
}

/// `go [wtime W] [btime B] [winc Wi] [binc Bi] [movestogo M] [depth D]
/// [nodes N] [movetime T] [mate K] [infinite] [searchmoves ...]`
pub fn parse_go(tokens: &[&str]) -> SearchLimits {
    fn argument<T: std::str::FromStr>(tokens: &[&str], i: usize) -> Option<T> {
        tokens.get(i + 1).and_then(|t| t.parse().ok())
    }

    let mut limits = SearchLimits::default();
    let mut i = 0;
    while i < tokens.len() {
        i = match tokens[i] {
            "wtime" => {
                limits.wtime = argument(tokens, i);
                i + 2
            }
            "btime" => {
                limits.btime = argument(tokens, i);
                i + 2
            }
            "movestogo" => {
                limits.movestogo = argument(tokens, i);
                i + 2
            }
            "nodes" => {
                limits.nodes = argument(tokens, i);
                i + 2
            }
            "movetime" => {
                limits.movetime = argument(tokens, i);
                i + 2
            }
            "winc" => {
                limits.winc = argument(tokens, i).unwrap_or(0);
                i + 2
            }
            "binc" => {
                limits.binc = argument(tokens, i).unwrap_or(0);
                i + 2
            }
            "depth" => {
                limits.depth = argument(tokens, i);
                i + 2
            }
            "mate" => {
                limits.mate = argument(tokens, i);
                i + 2
            }
            "infinite" => {
                limits.infinite = true;
                i + 1
            }
            "searchmoves" => {
                let mut j = i + 1;
                while j < tokens.len() && looks_like_move(tokens[j]) {
                    limits.searchmoves.push(tokens[j].to_string());
                    j += 1;
                }
                j
            }
            _ => i + 1,
        };
    }
    limits
}

fn looks_like_move(token: &str) -> bool {
    let bytes = token.as_bytes();
    (4..=5).contains(&bytes.len())
        && bytes[0].is_ascii_lowercase()
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_lowercase()
        && bytes[3].is_ascii_digit()
}

/// `setoption name <N...> [value <V...>]`
pub fn parse_setoption(tokens: &[&str]) -> Option<(String, String)> {
    if tokens.first() != Some(&"name") {
        return None;
    }
    let value_at = tokens.iter().position(|&t| t == "value");
    let name = tokens[1..value_at.unwrap_or(tokens.len())].join(" ");
    if name.is_empty() {
        return None;
    }
    let value = value_at
        .map(|i| tokens[i + 1..].join(" "))
        .unwrap_or_default();
    Some((name, value))
}

/// Loads a position and replays its move list in long-algebraic notation.
/// The board is only replaced once the whole command parsed and played
/// cleanly, so a bad FEN or move leaves the current game intact.
pub fn apply_position(
    board: &mut Board,
    fen: Option<&str>,
    moves: &[String],
) -> Result<(), EngineError> {
    let mut fresh = match fen {
        None => Board::new(),
        Some(fen) => Board::from_fen(fen)?,
    };
    for text in moves {
        let mv = find_move(&mut fresh, text)?;
        fresh.play(mv);
        // Committed game moves become the new ring root so long games never
        // exhaust the slots.
        fresh.rebase();
    }
    *board = fresh;
    Ok(())
}

/// Resolves long-algebraic text against the legal moves of the position.
pub fn find_move(board: &mut Board, text: &str) -> Result<Move, EngineError> {
    legal_moves(board)
        .into_iter()
        .find(|m| m.to_uci() == text)
        .ok_or_else(|| EngineError::IllegalMove(text.to_string()))
}
