// src/uci.rs
//
// UCI-flavoured text protocol over the 0..31 square indices of the
// board contract. Moves read and print as "8-12" (quiet) or "8x17"
// (capture, final landing square). Searches run synchronously; the
// embedder drives one command at a time.

use crate::engine::{self, Engine};
use crate::eval;
use crate::parameters::SearchParameters;
use crate::perft;
use crate::search::{Limits, MAX_PLY};
use crate::state::{Board, Move, BLACK, WHITE};
use crate::time::{TimeControl, TimeManager};
use std::io::{self, BufRead};

pub fn uci_loop(params: SearchParameters) {
    let stdin = io::stdin();
    let mut buffer = String::new();

    let mut engine = Engine::with_params(params.hash_mb, params.clone());
    engine.report = true;
    let mut board = Board::initial();
    let mut side = WHITE;

    loop {
        buffer.clear();
        match stdin.lock().read_line(&mut buffer) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let cmd = buffer.trim();
        if cmd.is_empty() {
            continue;
        }

        let parts: Vec<&str> = cmd.split_whitespace().collect();

        match parts[0] {
            "uci" => {
                println!("id name Poddavki");
                println!(
                    "option name Hash type spin default {} min 1 max 1024",
                    params.hash_mb
                );
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                board = Board::initial();
                side = WHITE;
                engine.clear_tables();
            }
            "position" => match parse_position(&parts) {
                Some((b, s)) => {
                    board = b;
                    side = s;
                }
                None => log::warn!("bad position command: {}", cmd),
            },
            "go" => {
                let (max_depth, limits) = parse_go(side, &parts, &params);
                let result = engine.search_with_limits(&board, side, max_depth, limits);
                if result.best_move.is_null() {
                    println!("bestmove (none)");
                } else {
                    println!("bestmove {}", result.best_move);
                }
            }
            "setoption" => {
                if parts.len() > 4 && parts[1] == "name" && parts[2] == "Hash" && parts[3] == "value" {
                    if let Ok(mb) = parts[4].parse::<usize>() {
                        engine.set_hash_size(mb);
                    }
                }
            }
            "perft" => {
                let depth = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);
                perft::perft_divide(&board, side, depth);
            }
            "d" => board.print(side),
            "eval" => println!("static eval (white view): {}", eval::evaluate(&board)),
            "quit" => break,
            _ => {}
        }
    }
}

fn parse_position(parts: &[&str]) -> Option<(Board, usize)> {
    let mut idx = 1;
    let (mut board, mut side) = match *parts.get(idx)? {
        "startpos" => {
            idx += 1;
            (Board::initial(), WHITE)
        }
        // Raw masks straight off the wire: white black kings w|b
        "pieces" => {
            let white = parse_mask(parts.get(idx + 1)?)?;
            let black = parse_mask(parts.get(idx + 2)?)?;
            let kings = parse_mask(parts.get(idx + 3)?)?;
            if white & black != 0 || kings & !(white | black) != 0 {
                return None;
            }
            let side = match *parts.get(idx + 4)? {
                "w" => WHITE,
                "b" => BLACK,
                _ => return None,
            };
            idx += 5;
            (Board::from_masks(white, black, kings, side), side)
        }
        _ => return None,
    };

    if parts.get(idx) == Some(&"moves") {
        for token in &parts[idx + 1..] {
            let mv = parse_move(&board, side, token)?;
            board = board.apply_move(&mv, side);
            side = 3 - side;
        }
    }
    Some((board, side))
}

fn parse_mask(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Resolve "from-to"/"fromxto" against the legal move list, so only
/// moves the rules allow ever reach the board.
fn parse_move(board: &Board, side: usize, text: &str) -> Option<Move> {
    let (from, to) = text.split_once(&['-', 'x'][..])?;
    let from: u32 = from.parse().ok()?;
    let to: u32 = to.parse().ok()?;
    if from >= 32 || to >= 32 {
        return None;
    }
    engine::generate_legal_moves(board, side)
        .into_iter()
        .find(|m| m.from == 1 << from && m.to == 1 << to)
}

fn parse_go(side: usize, parts: &[&str], params: &SearchParameters) -> (u8, Limits) {
    let mut depth: u8 = MAX_PLY as u8;
    let mut wtime: Option<u128> = None;
    let mut btime: Option<u128> = None;
    let mut winc: Option<u128> = None;
    let mut binc: Option<u128> = None;
    let mut movestogo: Option<u32> = None;
    let mut movetime: Option<u128> = None;
    let mut nodes: Option<u64> = None;
    let mut infinite = false;

    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                depth = parts.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(MAX_PLY as u8);
                i += 1;
            }
            "wtime" => {
                wtime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "btime" => {
                btime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "winc" => {
                winc = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "binc" => {
                binc = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "movestogo" => {
                movestogo = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "movetime" => {
                movetime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "nodes" => {
                nodes = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            "infinite" => infinite = true,
            _ => {}
        }
        i += 1;
    }

    let overhead = params.move_overhead_ms as u128;
    let limits = if infinite {
        Limits::Infinite
    } else if let Some(n) = nodes {
        Limits::FixedNodes(n)
    } else if let Some(mt) = movetime {
        Limits::FixedTime(TimeManager::new(TimeControl::MoveTime(mt), side, overhead))
    } else if wtime.is_some() || btime.is_some() {
        let tc = TimeControl::GameTime {
            wtime: wtime.unwrap_or(0),
            btime: btime.unwrap_or(0),
            winc: winc.unwrap_or(0),
            binc: binc.unwrap_or(0),
            moves_to_go: movestogo,
        };
        Limits::FixedTime(TimeManager::new(tc, side, overhead))
    } else {
        Limits::Infinite
    };

    (depth, limits)
}
