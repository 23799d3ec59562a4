pub mod bitboard;
pub mod engine;
pub mod eval;
pub mod logging;
pub mod movegen;
pub mod parameters;
pub mod perft;
pub mod search;
pub mod state;
pub mod time;
pub mod tt;
pub mod uci;
pub mod zobrist;

pub use engine::{apply_move, calculate_hash, generate_legal_moves, Engine};
pub use search::SearchResult;
pub use state::{Board, Move, BLACK, WHITE};

use std::env;
use std::thread;

/// One-shot setup: reproducible Zobrist keys plus a sized table.
pub fn init_engine(tt_size_mb: usize) -> Engine {
    Engine::new(tt_size_mb)
}

pub fn run_cli() {
    logging::init_logging();
    zobrist::init_zobrist();

    let args: Vec<String> = env::args().collect();

    let mut params = parameters::SearchParameters::default();
    if let Some(i) = args.iter().position(|a| a == "--params") {
        if let Some(path) = args.get(i + 1) {
            match parameters::SearchParameters::load_from_json(path) {
                Ok(p) => params = p,
                Err(e) => log::warn!("failed to load {}: {}", path, e),
            }
        }
    }

    if args.len() > 1 {
        if args[1] == "perft" {
            perft::run_perft_suite();
            return;
        }
        if args[1] == "bench" {
            let board = state::Board::initial();
            let mut engine = Engine::with_params(16, params);
            engine.report = true;
            println!("Running Benchmark: Opening Depth 10");
            engine.find_best_move(&board, state::WHITE, 10, 0);
            return;
        }
        if args[1] == "eval" {
            let board = state::Board::initial();
            println!("--- Debugging Eval ---");
            println!("Static score (white view): {}", eval::evaluate(&board));
            return;
        }
    }

    // Normal mode: run the protocol loop on its own roomy stack.
    let builder = thread::Builder::new()
        .name("uci_thread".into())
        .stack_size(32 * 1024 * 1024);

    let handler = builder
        .spawn(move || {
            uci::uci_loop(params);
        })
        .unwrap();

    handler.join().unwrap();
}
